use core::fmt::{self, Debug, Display};

use crate::exe::ExeFormatError;
use crate::protocol::ProtocolError;
use crate::validate::ValidationError;

/// An error which may occur while talking to the monitor.
///
/// `C` is the error type of the underlying
/// [`Connection`](crate::conn::Connection).
#[derive(Debug)]
#[non_exhaustive]
pub enum MonitorError<C> {
    /// Connection Error while starting the session.
    ConnectionInit(C),
    /// Connection Error while reading a reply.
    ConnectionRead(C),
    /// Connection Error while sending a command.
    ConnectionWrite(C),

    /// Request rejected before anything was sent.
    Validation(ValidationError),
    /// The console's reply did not match the protocol. The link may be out of
    /// sync afterwards.
    Protocol(ProtocolError),
    /// Executable could not be loaded.
    Format(ExeFormatError),
}

impl<C> MonitorError<C> {
    /// The request itself was malformed; nothing reached the wire.
    pub fn is_validation(&self) -> bool {
        matches!(self, MonitorError::Validation(_))
    }

    /// The console misbehaved or went quiet mid-command.
    pub fn is_protocol(&self) -> bool {
        matches!(self, MonitorError::Protocol(_))
    }

    /// The executable handed to the loader was unusable.
    pub fn is_format(&self) -> bool {
        matches!(self, MonitorError::Format(_))
    }
}

impl<C> From<ValidationError> for MonitorError<C> {
    fn from(e: ValidationError) -> Self {
        MonitorError::Validation(e)
    }
}

impl<C> From<ProtocolError> for MonitorError<C> {
    fn from(e: ProtocolError) -> Self {
        MonitorError::Protocol(e)
    }
}

impl<C> From<ExeFormatError> for MonitorError<C> {
    fn from(e: ExeFormatError) -> Self {
        MonitorError::Format(e)
    }
}

impl<C> Display for MonitorError<C>
where
    C: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::MonitorError::*;
        match self {
            ConnectionInit(e) => write!(f, "Connection Error while starting the session: {:?}", e),
            ConnectionRead(e) => write!(f, "Connection Error while reading reply: {:?}", e),
            ConnectionWrite(e) => write!(f, "Connection Error while sending command: {:?}", e),

            Validation(e) => write!(f, "Invalid request: {}", e),
            Protocol(e) => write!(f, "Protocol error: {}", e),
            Format(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<C> std::error::Error for MonitorError<C>
where
    C: Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::MonitorError::*;
        match self {
            Validation(e) => Some(e),
            Protocol(e) => Some(e),
            Format(e) => Some(e),
            _ => None,
        }
    }
}
