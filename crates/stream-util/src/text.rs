//! Whole-stream text reads.

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use thiserror::Error;

use crate::copy::copy_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Latin1,
    Ascii,
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
        })
    }
}

impl FromStr for Charset {
    type Err = TextError;

    /// Accepts the common labels, ignoring case, `-` and `_`.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let norm: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match norm.as_str() {
            "UTF8" => Ok(Charset::Utf8),
            "ISO88591" | "LATIN1" | "L1" | "CP819" => Ok(Charset::Latin1),
            "USASCII" | "ASCII" => Ok(Charset::Ascii),
            _ => Err(TextError::UnknownCharset(label.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TextError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid {charset} input at byte {offset}")]
    Decode { charset: Charset, offset: usize },

    #[error("unknown charset {0:?}")]
    UnknownCharset(String),
}

/// Reads `source` to its end and decodes it as `charset`.
///
/// Empty input yields an empty string. Trailing newlines are kept.
pub fn read_all_text<R: Read + ?Sized>(source: &mut R, charset: Charset) -> Result<String, TextError> {
    let mut bytes = Vec::new();
    copy_bytes(source, &mut bytes)?;
    decode(bytes, charset)
}

fn decode(bytes: Vec<u8>, charset: Charset) -> Result<String, TextError> {
    match charset {
        Charset::Utf8 => String::from_utf8(bytes).map_err(|e| TextError::Decode {
            charset,
            offset: e.utf8_error().valid_up_to(),
        }),
        Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(offset) => Err(TextError::Decode { charset, offset }),
            None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_labels() {
        assert_eq!("utf-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("ISO-8859-1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert_eq!("us_ascii".parse::<Charset>().unwrap(), Charset::Ascii);
        assert!(matches!(
            "EBCDIC".parse::<Charset>(),
            Err(TextError::UnknownCharset(label)) if label == "EBCDIC"
        ));
    }

    #[test]
    fn reads_utf8_with_trailing_newline() {
        let text = read_all_text(&mut "日付\n".as_bytes(), Charset::Utf8).unwrap();
        assert_eq!(text, "日付\n");
    }

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(read_all_text(&mut io::empty(), Charset::Utf8).unwrap(), "");
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let err = read_all_text(&mut &b"ab\xffcd"[..], Charset::Utf8).unwrap_err();
        assert!(matches!(
            err,
            TextError::Decode {
                charset: Charset::Utf8,
                offset: 2
            }
        ));
    }

    #[test]
    fn latin1_maps_every_byte() {
        let text = read_all_text(&mut &b"caf\xe9"[..], Charset::Latin1).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let err = read_all_text(&mut &b"ok\x80"[..], Charset::Ascii).unwrap_err();
        assert_eq!(err.to_string(), "invalid US-ASCII input at byte 2");
    }
}
