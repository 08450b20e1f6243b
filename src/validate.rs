//! Address, length, and chunk-size checks.
//!
//! Every check here is pure and runs before any byte is written to the
//! connection. A failed check is a caller mistake, so there is nothing to
//! retry.

use core::fmt::{self, Display};

/// One past the last addressable byte of the console's 32-bit address space.
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

/// Calls must land on an instruction boundary.
pub const CALL_ALIGNMENT: u32 = 4;

/// Default number of bytes moved per `R`/`W` command.
pub const DEFAULT_CHUNK_LENGTH: u8 = 128;

/// A request rejected before reaching the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// Address does not fit in 32 bits.
    AddressOutOfRange(u64),
    /// Read would run past the end of the address space.
    ReadOutOfBounds { addr: u32, len: usize },
    /// Write would run past the end of the address space.
    WriteOutOfBounds { addr: u32, len: usize },
    /// Call target is not word-aligned.
    UnalignedCall(u32),
    /// Chunk length outside `1..=255`.
    ChunkLengthOutOfRange(usize),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ValidationError::*;
        match self {
            AddressOutOfRange(addr) => write!(f, "address {:#x} is out of bounds", addr),
            ReadOutOfBounds { addr, len } => {
                write!(f, "read of {} bytes at {:#010x} is out of bounds", len, addr)
            }
            WriteOutOfBounds { addr, len } => {
                write!(f, "write of {} bytes at {:#010x} is out of bounds", len, addr)
            }
            UnalignedCall(addr) => write!(f, "call target {:#010x} is not word-aligned", addr),
            ChunkLengthOutOfRange(len) => {
                write!(f, "chunk length {} is outside 1..=255", len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

/// Narrow a host-side integer into a console address.
pub fn address(addr: u64) -> Result<u32, ValidationError> {
    if addr >= ADDRESS_SPACE_END {
        return Err(ValidationError::AddressOutOfRange(addr));
    }
    Ok(addr as u32)
}

fn fits(addr: u32, len: usize) -> bool {
    // usize -> u64 is lossless on every supported target
    (addr as u64)
        .checked_add(len as u64)
        .map_or(false, |end| end <= ADDRESS_SPACE_END)
}

/// Check that `len` bytes starting at `addr` stay inside the address space.
pub fn read_range(addr: u32, len: usize) -> Result<(), ValidationError> {
    if !fits(addr, len) {
        return Err(ValidationError::ReadOutOfBounds { addr, len });
    }
    Ok(())
}

/// Check that a `len`-byte payload written at `addr` stays inside the
/// address space.
pub fn write_range(addr: u32, len: usize) -> Result<(), ValidationError> {
    if !fits(addr, len) {
        return Err(ValidationError::WriteOutOfBounds { addr, len });
    }
    Ok(())
}

/// Check that `addr` is a legal call target.
pub fn call_target(addr: u32) -> Result<(), ValidationError> {
    if addr % CALL_ALIGNMENT != 0 {
        return Err(ValidationError::UnalignedCall(addr));
    }
    Ok(())
}

/// Check a requested chunk length, returning it as the wire-sized `u8`.
pub fn chunk_length(len: usize) -> Result<u8, ValidationError> {
    match len {
        1..=255 => Ok(len as u8),
        _ => Err(ValidationError::ChunkLengthOutOfRange(len)),
    }
}
