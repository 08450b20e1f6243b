use core::fmt;

use super::{CMD_CALL, CMD_PING, CMD_READ, CMD_WRITE};

/// Opcode, address, length, and a full chunk of write data.
pub const MAX_FRAME_LEN: usize = 1 + 4 + 1 + u8::MAX as usize;

/// A single command, as sent to the monitor.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `R addr len`
    Read { addr: u32, len: u8 },
    /// `W addr len data...`
    ///
    /// `data` must be at most 255 bytes long.
    Write { addr: u32, data: &'a [u8] },
    /// `X addr`
    Call { addr: u32 },
    /// `-`
    Ping,
}

impl<'a> Command<'a> {
    /// The command's opcode byte.
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Read { .. } => CMD_READ,
            Command::Write { .. } => CMD_WRITE,
            Command::Call { .. } => CMD_CALL,
            Command::Ping => CMD_PING,
        }
    }

    /// Serialize the command into `buf`, returning the frame length.
    ///
    /// # Panics
    ///
    /// Panics if a `Write` carries more than 255 bytes of data.
    pub fn encode(&self, buf: &mut [u8; MAX_FRAME_LEN]) -> usize {
        buf[0] = self.opcode();
        match *self {
            Command::Read { addr, len } => {
                buf[1..5].copy_from_slice(&addr.to_be_bytes());
                buf[5] = len;
                6
            }
            Command::Write { addr, data } => {
                assert!(data.len() <= u8::MAX as usize, "write chunk too long");
                buf[1..5].copy_from_slice(&addr.to_be_bytes());
                buf[5] = data.len() as u8;
                buf[6..6 + data.len()].copy_from_slice(data);
                6 + data.len()
            }
            Command::Call { addr } => {
                buf[1..5].copy_from_slice(&addr.to_be_bytes());
                5
            }
            Command::Ping => 1,
        }
    }
}

impl fmt::Debug for Command<'_> {
    // payloads are elided: they are logged separately when `trace-pkt` is on
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Read { addr, len } => write!(f, "R {:#010x} {}", addr, len),
            Command::Write { addr, data } => write!(f, "W {:#010x} {}", addr, data.len()),
            Command::Call { addr } => write!(f, "X {:#010x}", addr),
            Command::Ping => write!(f, "-"),
        }
    }
}
