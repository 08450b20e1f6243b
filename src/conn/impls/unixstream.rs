use std::os::unix::net::UnixStream;

use crate::conn::{Connection, READ_TIMEOUT};

impl Connection for UnixStream {
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
        self.set_read_timeout(Some(READ_TIMEOUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_out_with_short_read() {
        let (mut host, mut console) = UnixStream::pair().unwrap();
        host.on_session_start().unwrap();

        std::io::Write::write_all(&mut console, b"+").unwrap();

        let mut buf = [0; 4];
        assert_eq!(host.read_up_to(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'+');
    }
}
