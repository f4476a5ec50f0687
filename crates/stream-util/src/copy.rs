use std::io::{self, ErrorKind, Read, Write};

/// Chunk size used by [`copy_bytes`].
pub const BUFFER_SIZE: usize = 8192;

/// Copies `source` into `sink` until end of stream and returns the number of
/// bytes copied.
///
/// Interrupted reads are retried. Neither side is closed or flushed; both
/// stay owned by the caller.
pub fn copy_bytes<R, W>(source: &mut R, sink: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buf[..n])?;
        total += n as u64;
    }
    tracing::trace!(bytes = total, "stream copied");
    Ok(total)
}
