//! Connected in-process byte pipe.
//!
//! Bytes written to the [`PipeWriter`] become readable from the
//! [`PipeReader`] in order. The pipe holds a bounded number of written chunks;
//! a writer blocks while it is full. Dropping the writer ends the stream for
//! the reader, and writing after the reader is gone fails with
//! [`ErrorKind::BrokenPipe`].

use std::io::{self, ErrorKind, Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// Chunks buffered by [`pipe`] before the writer blocks.
pub const DEFAULT_CAPACITY: usize = 16;

pub fn pipe() -> (PipeReader, PipeWriter) {
    pipe_with_capacity(DEFAULT_CAPACITY)
}

pub fn pipe_with_capacity(chunks: usize) -> (PipeReader, PipeWriter) {
    let (tx, rx) = sync_channel(chunks);
    (
        PipeReader {
            rx,
            pending: Vec::new(),
            pos: 0,
        },
        PipeWriter { tx },
    )
}

#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    pos: usize,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.pending.len() {
            match self.rx.recv() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.pos = 0;
                }
                // Writer dropped.
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[derive(Debug, Clone)]
pub struct PipeWriter {
    tx: SyncSender<Vec<u8>>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(ErrorKind::BrokenPipe, "pipe reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_arrive_in_order() {
        let (mut r, mut w) = pipe();
        w.write_all(b"abc").unwrap();
        w.write_all(b"def").unwrap();
        drop(w);
        let mut out = String::new();
        r.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abcdef");
    }

    #[test]
    fn small_reads_drain_a_chunk() {
        let (mut r, mut w) = pipe();
        w.write_all(b"hello").unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"he");
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ll");
        assert_eq!(r.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'o');
    }

    #[test]
    fn dropped_writer_is_end_of_stream() {
        let (mut r, w) = pipe();
        drop(w);
        let mut buf = [0u8; 4];
        assert_eq!(r.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn dropped_reader_breaks_the_pipe() {
        let (r, mut w) = pipe();
        drop(r);
        assert_eq!(w.write(b"x").unwrap_err().kind(), ErrorKind::BrokenPipe);
    }
}
