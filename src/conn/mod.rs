//! Traits to perform in-order, serial, byte-wise I/O with the monitor.

mod impls;

use core::time::Duration;

/// How long a single read may wait for the monitor before giving up.
///
/// The monitor replies to every command almost immediately, so a short
/// timeout is enough to tell a dead link from a slow one.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A duplex byte stream to the monitor with a bounded read timeout.
///
/// When the `std` feature is enabled, this trait is automatically implemented
/// for [`TcpStream`](std::net::TcpStream) and
/// [`UnixStream`](std::os::unix::net::UnixStream) (on unix systems).
pub trait Connection {
    /// Transport-specific error type.
    type Error;

    /// Write the entire buffer, blocking until complete.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Flush this Connection, ensuring that all intermediately buffered
    /// contents reach their destination.
    ///
    /// _Note:_ Not all `Connection`s have internal buffering. In these cases,
    /// it's fine to simply return `Ok(())`.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Read up to `buf.len()` bytes, blocking until the buffer is full or the
    /// read timeout elapses.
    ///
    /// Returns the number of bytes actually stored in `buf`. A short count is
    /// _not_ an error: it means the remote side went quiet for longer than
    /// the timeout. Errors are reserved for failures of the transport itself.
    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Called once when a [`Monitor`](crate::Monitor) session is built around
    /// this connection, _before_ any command is sent.
    ///
    /// This method's default implementation is a no-op.
    ///
    /// # Example
    ///
    /// The `on_session_start` implementation for `TcpStream` installs
    /// [`READ_TIMEOUT`] and enables `TCP_NODELAY`. Every command is a tiny
    /// request followed by a tiny reply, so Nagle's algorithm would stall
    /// each round trip.
    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
