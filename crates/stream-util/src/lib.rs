//! Byte-stream plumbing: bounded-buffer copy, whole-stream text reads and a
//! connected in-process pipe.
//!
//! Nothing here closes a stream it was handed; callers own both ends.

pub mod copy;
pub mod pipe;
pub mod text;

pub use copy::{copy_bytes, BUFFER_SIZE};
pub use pipe::{pipe, pipe_with_capacity, PipeReader, PipeWriter};
pub use text::{read_all_text, Charset, TextError};
