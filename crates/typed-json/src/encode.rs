//! Value tree to compact JSON text.
//!
//! Record fields are written in declaration order and mapping entries in
//! insertion order, so encoding is deterministic for a given tree. Dates use
//! the parser's canonical layout. Non-finite floats have no JSON form and are
//! written as `null`.
//!
//! Mapping keys are written as their string form, so distinct keys with the
//! same text (`Key::Null` and `Key::Str("null")`, `Key::Int(1)` and
//! `Key::Str("1")`) become duplicate members. Decoding such text keeps one
//! member, the last value in the first position.

use std::fmt::Write as _;

use crate::date::DateParser;
use crate::value::{Key, Value};

pub struct Encoder<'a> {
    dates: &'a DateParser,
}

impl<'a> Encoder<'a> {
    pub fn new(dates: &'a DateParser) -> Self {
        Self { dates }
    }

    pub fn encode(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(value, &mut out);
        out
    }

    pub fn write_value(&self, value: &Value, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) => write_float(*f, out),
            Value::Str(s) => write_str(s, out),
            Value::Date(d) => write_str(&self.dates.format(d), out),
            Value::Seq(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_value(item, out);
                }
                out.push(']');
            }
            Value::Map(map) => {
                out.push('{');
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_key(key, out);
                    out.push(':');
                    self.write_value(item, out);
                }
                out.push('}');
            }
            Value::Record(record) => {
                out.push('{');
                for (i, (name, item)) in record.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_str(name, out);
                    out.push(':');
                    self.write_value(item, out);
                }
                out.push('}');
            }
        }
    }

    fn write_key(&self, key: &Key, out: &mut String) {
        match key {
            Key::Str(s) => write_str(s, out),
            Key::Date(d) => write_str(&self.dates.format(d), out),
            other => write_str(&other.to_string(), out),
        }
    }
}

fn write_float(f: f64, out: &mut String) {
    match serde_json::Number::from_f64(f) {
        Some(n) => {
            let _ = write!(out, "{n}");
        }
        None => out.push_str("null"),
    }
}

/// Writes `s` as a quoted JSON string.
///
/// Escapes the quote, the backslash and control characters; everything else,
/// including non-ASCII text, is written through unchanged.
pub fn write_str(s: &str, out: &mut String) {
    out.push('"');
    let mut last = 0;
    for (i, ch) in s.char_indices() {
        let short = match ch {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\u{0008}' => Some("\\b"),
            '\t' => Some("\\t"),
            '\n' => Some("\\n"),
            '\u{000C}' => Some("\\f"),
            '\r' => Some("\\r"),
            c if c < '\u{0020}' => None,
            _ => continue,
        };
        out.push_str(&s[last..i]);
        match short {
            Some(esc) => out.push_str(esc),
            None => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
        }
        last = i + ch.len_utf8();
    }
    out.push_str(&s[last..]);
    out.push('"');
}
