//! PS-X EXE parsing.
//!
//! A PS-X EXE is a 2 KiB header followed by a flat payload:
//!
//! | Offset | Size | Field                                    |
//! |--------|------|------------------------------------------|
//! | 0      | 8    | magic, `"PS-X EXE"`                      |
//! | 16     | 4    | entry point (`pc0`)                      |
//! | 20     | 4    | initial global pointer (`gp0`)           |
//! | 24     | 4    | load address                             |
//! | 28     | 4    | load length                              |
//! | 2048   | ...  | payload, copied verbatim to load address |
//!
//! All header fields are little-endian. The remaining header bytes (stack
//! setup, region marker) are ignored.

use core::convert::TryInto;
use core::fmt::{self, Display};

/// Magic tag at the start of every PS-X EXE.
pub const MAGIC: &[u8; 8] = b"PS-X EXE";

/// Offset of the first payload byte; also the minimum file size.
pub const DATA_OFFSET: usize = 2048;

const FIELDS_OFFSET: usize = 16;

/// The executable is not something the loader can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExeFormatError {
    /// Smaller than the fixed header.
    TooShort(usize),
    /// Missing the `PS-X EXE` tag.
    BadMagic,
    /// Payload region shorter than the declared load length.
    Truncated { declared: u32, available: usize },
}

impl Display for ExeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ExeFormatError::*;
        match self {
            TooShort(len) => write!(
                f,
                "invalid PSX executable: {} bytes is smaller than the {} byte header",
                len, DATA_OFFSET
            ),
            BadMagic => write!(f, "invalid PSX executable: missing PS-X EXE tag"),
            Truncated {
                declared,
                available,
            } => write!(
                f,
                "PSX executable is shorter than expected: header declares {} bytes, only {} present",
                declared, available
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExeFormatError {}

/// The header fields the loader cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExeHeader {
    /// Initial program counter.
    pub entry: u32,
    /// Initial `$gp`. Parsed for completeness, the monitor's call command has
    /// no way to set it.
    pub gp: u32,
    /// Where the payload is copied to.
    pub load_addr: u32,
    /// Number of payload bytes.
    pub load_len: u32,
}

/// A validated executable, borrowing its payload from the input buffer.
#[derive(Debug, Clone, Copy)]
pub struct PsxExe<'a> {
    pub header: ExeHeader,
    pub payload: &'a [u8],
}

fn le_u32(buf: &[u8], offset: usize) -> u32 {
    // offsets are fixed and always inside the checked header
    let mut b = [0; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(b)
}

impl<'a> PsxExe<'a> {
    /// Validate `data` and split it into header and payload.
    ///
    /// Any bytes past the declared payload are ignored.
    pub fn parse(data: &'a [u8]) -> Result<PsxExe<'a>, ExeFormatError> {
        if data.len() < DATA_OFFSET {
            return Err(ExeFormatError::TooShort(data.len()));
        }
        if &data[..MAGIC.len()] != MAGIC {
            return Err(ExeFormatError::BadMagic);
        }

        let header = ExeHeader {
            entry: le_u32(data, FIELDS_OFFSET),
            gp: le_u32(data, FIELDS_OFFSET + 4),
            load_addr: le_u32(data, FIELDS_OFFSET + 8),
            load_len: le_u32(data, FIELDS_OFFSET + 12),
        };

        let available = &data[DATA_OFFSET..];
        let payload = header
            .load_len
            .try_into()
            .ok()
            .and_then(|len: usize| available.get(..len))
            .ok_or(ExeFormatError::Truncated {
                declared: header.load_len,
                available: available.len(),
            })?;

        Ok(PsxExe { header, payload })
    }
}
