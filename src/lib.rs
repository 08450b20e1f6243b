//! A host-side client for the PlayStation 1 serial debug monitor.
//!
//! The monitor is a tiny program running on the console that understands four
//! single-byte commands: read memory (`R`), write memory (`W`), call an
//! address (`X`), and a readiness ping (`-`). `psmon` frames those commands,
//! splits large transfers into link-sized chunks, checks every
//! acknowledgment, and validates addresses before anything hits the wire.
//!
//! On top of those primitives sits a loader for PS-X executables: the payload
//! is written to its load address and the entry point is called.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use psmon::Monitor;
//!
//! let stream = std::net::TcpStream::connect("127.0.0.1:3333")?;
//! let mut mon = Monitor::new(stream)?;
//! mon.wait_for_ready()?;
//!
//! let bios_header = mon.read(0xbfc0_0000, 0x100)?;
//! assert_eq!(bios_header.len(), 0x100);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `alloc`
//!   - Enables [`Monitor::read`], which returns a freshly allocated `Vec`.
//!   - Implements [`Connection`](conn::Connection) for boxed connections.
//! - `std` (implies `alloc`)
//!   - Implements [`Connection`](conn::Connection) for `TcpStream` and
//!     `UnixStream`.
//!   - Implements `std::error::Error` on all error types.
//! - `trace-pkt`
//!   - Logs every outgoing frame and every reply via `trace!`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
extern crate log;

pub mod conn;
pub mod exe;
pub mod protocol;
pub mod validate;

mod monitor;

pub use monitor::{Monitor, MonitorBuilder, MonitorError};
