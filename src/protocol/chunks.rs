//! Splitting transfers into command-sized pieces.
//!
//! Callers must have validated `addr + buf.len()` with
//! [`validate`](crate::validate) first: chunk addresses are computed with
//! wrapping arithmetic that is only exact inside the address space.

/// Pair each chunk of `buf` with the console address it maps to.
pub(crate) fn chunked(
    addr: u32,
    buf: &[u8],
    max_len: u8,
) -> impl Iterator<Item = (u32, &[u8])> + '_ {
    let step = max_len as usize;
    buf.chunks(step)
        .enumerate()
        .map(move |(i, chunk)| (addr.wrapping_add((i * step) as u32), chunk))
}

/// Mutable counterpart of [`chunked`], used to fill a read buffer in place.
pub(crate) fn chunked_mut(
    addr: u32,
    buf: &mut [u8],
    max_len: u8,
) -> impl Iterator<Item = (u32, &mut [u8])> + '_ {
    let step = max_len as usize;
    buf.chunks_mut(step)
        .enumerate()
        .map(move |(i, chunk)| (addr.wrapping_add((i * step) as u32), chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(addr: u32, len: usize, max_len: u8) -> Vec<(u32, usize)> {
        let buf = vec![0; len];
        chunked(addr, &buf, max_len)
            .map(|(a, c)| (a, c.len()))
            .collect()
    }

    #[test]
    fn exact_multiple() {
        assert_eq!(
            layout(0x100, 256, 128),
            [(0x100, 128), (0x180, 128)]
        );
    }

    #[test]
    fn remainder_goes_last() {
        assert_eq!(
            layout(0x8000_0000, 300, 128),
            [(0x8000_0000, 128), (0x8000_0080, 128), (0x8000_0100, 44)]
        );
    }

    #[test]
    fn empty_transfer_has_no_chunks() {
        assert!(layout(0x1234, 0, 128).is_empty());
    }

    #[test]
    fn contiguous_for_all_limits() {
        for max_len in [1u8, 7, 128, 255].iter().copied() {
            for len in [0usize, 1, 254, 255, 256, 1000].iter().copied() {
                let chunks = layout(0x10, len, max_len);
                let expected = (len + max_len as usize - 1) / max_len as usize;
                assert_eq!(chunks.len(), expected);

                let mut next = 0x10;
                for (addr, clen) in &chunks {
                    assert_eq!(*addr, next);
                    assert!(*clen >= 1 && *clen <= max_len as usize);
                    next += *clen as u32;
                }
                assert_eq!(next - 0x10, len as u32);
            }
        }
    }

    #[test]
    fn top_of_address_space() {
        assert_eq!(
            layout(0xffff_ff00, 0x100, 255),
            [(0xffff_ff00, 255), (0xffff_ffff, 1)]
        );
    }

    #[test]
    fn mut_chunks_cover_buffer() {
        let mut buf = [0u8; 10];
        for (addr, chunk) in chunked_mut(0x20, &mut buf, 4) {
            for b in chunk.iter_mut() {
                *b = addr as u8;
            }
        }
        assert_eq!(buf, [0x20, 0x20, 0x20, 0x20, 0x24, 0x24, 0x24, 0x24, 0x28, 0x28]);
    }
}
