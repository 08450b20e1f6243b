use std::net::TcpStream;

use crate::conn::{Connection, READ_TIMEOUT};

impl Connection for TcpStream {
    type Error = std::io::Error;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        use std::io::Write;

        Write::write_all(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        use std::io::Write;

        Write::flush(self)
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        super::read_up_to_io(self, buf)
    }

    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        self.set_nodelay(true)?;
        self.set_read_timeout(Some(READ_TIMEOUT))
    }
}
