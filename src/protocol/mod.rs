//! Wire format of the monitor protocol.
//!
//! Every command starts with a single ASCII opcode. Addresses are big-endian
//! `u32`s and lengths are a single byte. The monitor answers each command with
//! a one byte acknowledgment, except the readiness ping which is echoed back.

use core::fmt::{self, Display};

mod chunks;
mod command;

pub(crate) use chunks::{chunked, chunked_mut};
pub use command::{Command, MAX_FRAME_LEN};

/// Opcode: read memory.
pub const CMD_READ: u8 = b'R';
/// Opcode: write memory.
pub const CMD_WRITE: u8 = b'W';
/// Opcode: call an address.
pub const CMD_CALL: u8 = b'X';
/// Opcode: readiness ping. The monitor echoes it back when idle.
pub const CMD_PING: u8 = b'-';

/// Acknowledgment sent by the monitor after accepting a command.
pub const ACK: u8 = b'+';

/// The monitor did not answer the way the protocol requires.
///
/// After any of these the state of the link is unknown: the monitor may still
/// be sending bytes belonging to the failed command. Re-synchronize with
/// [`Monitor::wait_for_ready`](crate::Monitor::wait_for_ready) or drop the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Nothing arrived before the read timeout.
    MissingAck,
    /// The monitor answered with something other than [`ACK`].
    UnexpectedAck(u8),
    /// The data phase of a read ended early.
    ShortRead { expected: usize, received: usize },
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ProtocolError::*;
        match self {
            MissingAck => write!(f, "console did not ACK"),
            UnexpectedAck(b) => write!(f, "console did not ACK (got {:#04x})", b),
            ShortRead { expected, received } => write!(
                f,
                "unexpected end of read: expected {} bytes, got {}",
                expected, received
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
