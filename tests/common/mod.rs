//! An in-memory stand-in for the console side of the link.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};

use psmon::conn::Connection;

/// A command as the emulated monitor decoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Read { addr: u32, len: u8 },
    Write { addr: u32, data: Vec<u8> },
    Call(u32),
    Ping,
}

/// Emulates the monitor program: a sparse 32-bit address space plus a
/// handful of knobs to make it misbehave.
#[derive(Debug, Default)]
pub struct EmulatedMonitor {
    pub mem: BTreeMap<u32, u8>,
    pub seen: Vec<Seen>,
    pending: VecDeque<u8>,

    /// Answer the N-th command (0-based, pings excluded) with this byte
    /// instead of `+`.
    pub bad_ack_at: Option<(usize, u8)>,
    /// Drop the last byte of the data phase of the N-th command.
    pub short_read_at: Option<usize>,
    /// Ignore this many pings before echoing.
    pub ping_misses: usize,
    /// Bytes handed back to missed pings; silence when exhausted.
    pub ping_noise: VecDeque<u8>,
}

impl EmulatedMonitor {
    pub fn new() -> EmulatedMonitor {
        EmulatedMonitor::default()
    }

    pub fn load(&mut self, addr: u32, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.mem.insert(addr.wrapping_add(i as u32), *b);
        }
    }

    pub fn peek(&self, addr: u32, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| *self.mem.get(&addr.wrapping_add(i as u32)).unwrap_or(&0))
            .collect()
    }

    /// Every command except pings.
    pub fn commands(&self) -> Vec<&Seen> {
        self.seen.iter().filter(|s| **s != Seen::Ping).collect()
    }

    pub fn pings(&self) -> usize {
        self.seen.iter().filter(|s| **s == Seen::Ping).count()
    }

    fn ack_for(&self, index: usize) -> u8 {
        match self.bad_ack_at {
            Some((i, b)) if i == index => b,
            _ => b'+',
        }
    }

    fn handle(&mut self, frame: &[u8]) -> Result<(), String> {
        let addr = |frame: &[u8]| -> Result<u32, String> {
            let b = frame.get(1..5).ok_or("frame too short for address")?;
            Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        };
        let index = self.commands().len();

        match frame.first() {
            Some(b'R') => {
                if frame.len() != 6 {
                    return Err(format!("bad read frame {:02x?}", frame));
                }
                let (addr, len) = (addr(frame)?, frame[5]);
                self.seen.push(Seen::Read { addr, len });

                let ack = self.ack_for(index);
                self.pending.push_back(ack);
                if ack == b'+' {
                    let mut data = self.peek(addr, len as usize);
                    if self.short_read_at == Some(index) {
                        data.pop();
                    }
                    self.pending.extend(data);
                }
            }
            Some(b'W') => {
                let len = *frame.get(5).ok_or("frame too short for length")? as usize;
                if frame.len() != 6 + len {
                    return Err(format!("bad write frame {:02x?}", frame));
                }
                let addr = addr(frame)?;
                let data = frame[6..].to_vec();
                self.seen.push(Seen::Write {
                    addr,
                    data: data.clone(),
                });

                let ack = self.ack_for(index);
                if ack == b'+' {
                    self.load(addr, &data);
                }
                self.pending.push_back(ack);
            }
            Some(b'X') => {
                if frame.len() != 5 {
                    return Err(format!("bad call frame {:02x?}", frame));
                }
                self.seen.push(Seen::Call(addr(frame)?));
                let ack = self.ack_for(index);
                self.pending.push_back(ack);
            }
            Some(b'-') if frame.len() == 1 => {
                self.seen.push(Seen::Ping);
                if self.ping_misses > 0 {
                    self.ping_misses -= 1;
                    if let Some(b) = self.ping_noise.pop_front() {
                        self.pending.push_back(b);
                    }
                } else {
                    self.pending.push_back(b'-');
                }
            }
            _ => return Err(format!("unknown frame {:02x?}", frame)),
        }

        Ok(())
    }
}

impl Connection for EmulatedMonitor {
    type Error = String;

    // every command must arrive as one write
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.handle(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.pending.len());
        for (dst, src) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

pub fn init_logging() {
    let _ = pretty_env_logger::try_init();
}
