//! Lenient date parsing with a single canonical output layout.
//!
//! Input is tried against an ordered list of `strftime` layouts and the first
//! full match wins. Layouts without a time component yield midnight. Blank
//! input is not an error: it reads as "no date".

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{CodecError, Result};

/// Layout used for output, and the first one tried on input.
pub const CANONICAL_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Built-in input layouts, in match order.
pub const DEFAULT_LAYOUTS: &[&str] = &[
    CANONICAL_LAYOUT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d",
    "%Y%m%d%H%M%S",
    "%Y%m%d",
    "%Y年%m月%d日 %H:%M:%S",
    "%Y年%m月%d日 %H:%M",
    "%Y年%m月%d日",
];

// Specifiers that put a time of day into a layout.
const TIME_SPECIFIERS: &[&str] = &[
    "%H", "%I", "%k", "%l", "%M", "%S", "%T", "%R", "%X", "%r", "%c", "%+", "%s",
];

/// One accepted input layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    pattern: String,
    has_time: bool,
}

impl DateLayout {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        let has_time = has_time_of_day(&pattern);
        Ok(Self { pattern, has_time })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_time {
            NaiveDateTime::parse_from_str(text, &self.pattern).ok()
        } else {
            NaiveDate::parse_from_str(text, &self.pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }
    }
}

fn has_time_of_day(pattern: &str) -> bool {
    TIME_SPECIFIERS.iter().any(|spec| pattern.contains(spec))
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(CodecError::Config(format!(
            "invalid date layout {pattern:?}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    layouts: Vec<DateLayout>,
    canonical: String,
}

impl Default for DateParser {
    fn default() -> Self {
        let layouts = DEFAULT_LAYOUTS
            .iter()
            .map(|pattern| DateLayout {
                pattern: (*pattern).to_string(),
                has_time: has_time_of_day(pattern),
            })
            .collect();
        Self {
            layouts,
            canonical: CANONICAL_LAYOUT.to_string(),
        }
    }
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the output layout.
    ///
    /// The layout is also tried first on input so that formatted dates
    /// always parse back.
    pub fn with_canonical(mut self, pattern: &str) -> Result<Self> {
        let layout = DateLayout::new(pattern)?;
        self.layouts.retain(|l| l.pattern != layout.pattern);
        self.layouts.insert(0, layout);
        self.canonical = pattern.to_string();
        Ok(self)
    }

    /// Appends an input layout after the existing ones.
    pub fn with_layout(mut self, pattern: &str) -> Result<Self> {
        let layout = DateLayout::new(pattern)?;
        if !self.layouts.contains(&layout) {
            self.layouts.push(layout);
        }
        Ok(self)
    }

    pub fn layouts(&self) -> &[DateLayout] {
        &self.layouts
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Parses `text`; blank input yields `Ok(None)`.
    pub fn parse(&self, text: &str) -> Result<Option<NaiveDateTime>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.layouts
            .iter()
            .find_map(|layout| layout.parse(text))
            .map(Some)
            .ok_or_else(|| CodecError::DateFormat {
                text: text.to_string(),
            })
    }

    /// Renders `date` in the canonical layout.
    pub fn format(&self, date: &NaiveDateTime) -> String {
        date.format(&self.canonical).to_string()
    }

    /// Reads epoch milliseconds as UTC wall time.
    pub fn from_epoch_millis(&self, millis: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
    }
}
