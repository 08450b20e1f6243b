cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        mod tcpstream;

        #[cfg(unix)]
        mod unixstream;
    }
}

#[cfg(feature = "alloc")]
mod boxed;

/// Shared `read_up_to` for `std::io` streams configured with a read timeout.
///
/// A timed-out read surfaces as `WouldBlock` or `TimedOut` depending on the
/// platform; both end the read with whatever has arrived so far. So does
/// end-of-stream.
#[cfg(feature = "std")]
fn read_up_to_io<R: std::io::Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::io::ErrorKind;

    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
