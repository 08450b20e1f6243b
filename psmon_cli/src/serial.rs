//! A raw TTY connection, configured through termios.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use psmon::conn::{Connection, READ_TIMEOUT};

/// A serial port in raw 8N1 mode with a `VTIME` read timeout.
///
/// The port is closed when dropped.
#[derive(Debug)]
pub struct SerialPort {
    file: File,
}

fn cvt(ret: libc::c_int) -> io::Result<()> {
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

impl SerialPort {
    pub fn open(path: &str, baud: u32) -> io::Result<SerialPort> {
        let speed = baud_constant(baud).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported baud rate {}", baud),
            )
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)?;
        let fd = file.as_raw_fd();

        // VTIME counts tenths of a second
        let vtime = (READ_TIMEOUT.as_millis() / 100).max(1) as libc::cc_t;

        // SAFETY: `fd` is an open descriptor owned by `file`, and `tio` is a
        // plain C struct fully initialized by `tcgetattr` before use.
        unsafe {
            let mut tio: libc::termios = core::mem::zeroed();
            cvt(libc::tcgetattr(fd, &mut tio))?;

            libc::cfmakeraw(&mut tio);
            tio.c_cflag |= libc::CLOCAL | libc::CREAD;
            tio.c_cflag &= !(libc::CSTOPB | libc::CRTSCTS);
            tio.c_cc[libc::VMIN] = 0;
            tio.c_cc[libc::VTIME] = vtime;

            cvt(libc::cfsetispeed(&mut tio, speed))?;
            cvt(libc::cfsetospeed(&mut tio, speed))?;
            cvt(libc::tcsetattr(fd, libc::TCSANOW, &tio))?;
            // drop whatever the console sent before we were listening
            cvt(libc::tcflush(fd, libc::TCIOFLUSH))?;
        }

        debug!("opened {} at {} baud", path, baud);
        Ok(SerialPort { file })
    }
}

impl Connection for SerialPort {
    type Error = io::Error;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        Write::write_all(&mut self.file, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // SAFETY: the descriptor stays open for as long as `self.file` lives.
        cvt(unsafe { libc::tcdrain(self.file.as_raw_fd()) })
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            // with VMIN = 0, a read returning nothing means VTIME elapsed
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}
