//! The core [`Monitor`] type, used to drive the console's debug monitor over a
//! given [`Connection`].

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::conn::Connection;
use crate::exe::PsxExe;
use crate::protocol::{self, Command, ProtocolError, ACK, CMD_PING, MAX_FRAME_LEN};
use crate::validate;

mod builder;
mod error;

pub use builder::MonitorBuilder;
pub use error::MonitorError;

use MonitorError as Error;

/// A session with the console's debug monitor.
///
/// The session owns its connection. Dropping the `Monitor` drops the
/// connection, which releases the underlying port on every exit path.
///
/// The protocol has no request IDs, so commands must never interleave. Every
/// operation takes `&mut self`; to share a session between threads, wrap it in
/// a `Mutex`.
#[derive(Debug)]
pub struct Monitor<C: Connection> {
    conn: C,
    max_chunk_length: u8,
}

impl<C: Connection> Monitor<C> {
    /// Create a [`MonitorBuilder`] using the provided Connection.
    pub fn builder(conn: C) -> MonitorBuilder<C> {
        MonitorBuilder::new(conn)
    }

    /// Start a session over `conn` with the default settings.
    ///
    /// For control over the chunk length, use [`Monitor::builder`].
    pub fn new(conn: C) -> Result<Monitor<C>, Error<C::Error>> {
        MonitorBuilder::new(conn).build()
    }

    /// Maximum number of bytes moved by a single read/write command.
    pub fn max_chunk_length(&self) -> u8 {
        self.max_chunk_length
    }

    /// Change the maximum number of bytes moved by a single read/write
    /// command. Must be within `1..=255`.
    ///
    /// Takes effect on the next transfer.
    pub fn set_max_chunk_length(&mut self, len: usize) -> Result<(), validate::ValidationError> {
        self.max_chunk_length = validate::chunk_length(len)?;
        Ok(())
    }

    /// Get a mutable reference to the underlying connection.
    pub fn borrow_conn(&mut self) -> &mut C {
        &mut self.conn
    }

    /// End the session, handing the connection back to the caller.
    pub fn into_conn(self) -> C {
        self.conn
    }

    /// End the session, flushing and then releasing the connection.
    pub fn close(mut self) -> Result<(), Error<C::Error>> {
        self.conn.flush().map_err(Error::ConnectionWrite)
    }

    /// Read `buf.len()` bytes of console memory starting at `addr`.
    ///
    /// The transfer is split into commands of at most
    /// [`max_chunk_length`](Self::max_chunk_length) bytes. If any of them
    /// fails the contents of `buf` are unspecified.
    pub fn read_into(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Error<C::Error>> {
        validate::read_range(addr, buf.len())?;

        debug!(
            "reading {} bytes at {:#010x} (chunk length {})",
            buf.len(),
            addr,
            self.max_chunk_length
        );

        for (chunk_addr, chunk) in protocol::chunked_mut(addr, buf, self.max_chunk_length) {
            self.send(Command::Read {
                addr: chunk_addr,
                len: chunk.len() as u8,
            })?;
            self.expect_ack()?;

            let received = self.conn.read_up_to(chunk).map_err(Error::ConnectionRead)?;

            #[cfg(feature = "trace-pkt")]
            trace!("<-- {:02x?}", &chunk[..received]);

            if received != chunk.len() {
                warn!(
                    "read at {:#010x} ended after {} of {} bytes",
                    chunk_addr,
                    received,
                    chunk.len()
                );
                return Err(ProtocolError::ShortRead {
                    expected: chunk.len(),
                    received,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Read `len` bytes of console memory starting at `addr`.
    ///
    /// Nothing is returned unless every chunk succeeds.
    #[cfg(feature = "alloc")]
    pub fn read(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, Error<C::Error>> {
        // validate before allocating, so absurd lengths fail cleanly
        validate::read_range(addr, len)?;

        let mut buf = alloc::vec![0; len];
        self.read_into(addr, &mut buf)?;
        Ok(buf)
    }

    /// Write `data` to console memory starting at `addr`.
    ///
    /// The transfer is split into commands of at most
    /// [`max_chunk_length`](Self::max_chunk_length) bytes. A failure part way
    /// through leaves the earlier chunks written.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), Error<C::Error>> {
        validate::write_range(addr, data.len())?;

        debug!(
            "writing {} bytes at {:#010x} (chunk length {})",
            data.len(),
            addr,
            self.max_chunk_length
        );

        for (chunk_addr, chunk) in protocol::chunked(addr, data, self.max_chunk_length) {
            self.send(Command::Write {
                addr: chunk_addr,
                data: chunk,
            })?;
            self.expect_ack()?;
        }

        Ok(())
    }

    /// Jump to the code at `addr`, which must be word-aligned.
    ///
    /// Returns once the monitor acknowledges the call, which says nothing
    /// about the called code having finished. If that code returns, the
    /// monitor resumes listening for commands.
    pub fn call(&mut self, addr: u32) -> Result<(), Error<C::Error>> {
        validate::call_target(addr)?;

        debug!("calling {:#010x}", addr);
        self.send(Command::Call { addr })?;
        self.expect_ack()
    }

    /// Block until the monitor answers a ping.
    ///
    /// Sends `-` and waits one read timeout for the echo, over and over. There
    /// is no retry limit: if the console never answers, this never returns.
    /// Bytes that are not the echo (e.g: leftovers of an aborted command) are
    /// discarded, which makes this the way to re-synchronize after a
    /// [`ProtocolError`].
    pub fn wait_for_ready(&mut self) -> Result<(), Error<C::Error>> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            self.send(Command::Ping)?;

            let mut echo = [0];
            let n = self
                .conn
                .read_up_to(&mut echo)
                .map_err(Error::ConnectionRead)?;

            #[cfg(feature = "trace-pkt")]
            trace!("<-- {:02x?}", &echo[..n]);

            if n == 1 && echo[0] == CMD_PING {
                debug!("monitor ready after {} ping(s)", attempts);
                return Ok(());
            }
        }
    }

    /// Load a PS-X EXE and jump to its entry point.
    ///
    /// `exe` is the complete file contents. The header is checked before
    /// anything is sent, so a malformed file never reaches the console.
    pub fn execute(&mut self, exe: &[u8]) -> Result<(), Error<C::Error>> {
        let exe = PsxExe::parse(exe)?;
        let header = exe.header;

        info!(
            "loading {} bytes at {:#010x}, entry {:#010x}",
            header.load_len, header.load_addr, header.entry
        );

        self.write(header.load_addr, exe.payload)?;
        self.call(header.entry)
    }

    fn send(&mut self, cmd: Command<'_>) -> Result<(), Error<C::Error>> {
        let mut frame = [0; MAX_FRAME_LEN];
        let len = cmd.encode(&mut frame);

        #[cfg(feature = "trace-pkt")]
        trace!("--> {:?} {:02x?}", cmd, &frame[..len]);

        self.conn
            .write_all(&frame[..len])
            .map_err(Error::ConnectionWrite)?;
        self.conn.flush().map_err(Error::ConnectionWrite)
    }

    fn expect_ack(&mut self) -> Result<(), Error<C::Error>> {
        let mut ack = [0];
        let n = self
            .conn
            .read_up_to(&mut ack)
            .map_err(Error::ConnectionRead)?;

        let err = match (n, ack[0]) {
            (1, ACK) => return Ok(()),
            (0, _) => ProtocolError::MissingAck,
            (_, other) => ProtocolError::UnexpectedAck(other),
        };
        warn!("{}", err);
        Err(err.into())
    }
}
