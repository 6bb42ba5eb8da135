//! Normalization of user supplied dates.
//!
//! Accepted shapes: `01.01.19`, `01.01.2019` (delimiters `.`, `/`, `-`),
//! `010119` and `01012019`. Two digit years belong to the 2000s.

use crate::utils::error::{RatesError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const DISPLAY_FORMAT: &str = "%d.%m.%Y";
const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Target representation of a normalized date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    /// `DD.MM.YYYY`
    Display,
    /// `YYYY-MM-DD`, the shape the bank API expects.
    Wire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue(NaiveDate);

fn delimited_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[./-](\d{1,2})[./-](\d{2}|\d{4})$")
            .expect("delimited date pattern is valid")
    })
}

impl DateValue {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || RatesError::InvalidDateFormat {
            input: input.to_string(),
        };

        let (day, month, year_text) = if let Some(caps) = delimited_pattern().captures(trimmed) {
            (
                caps[1].parse::<u32>().map_err(|_| invalid())?,
                caps[2].parse::<u32>().map_err(|_| invalid())?,
                caps.get(3).map_or("", |m| m.as_str()),
            )
        } else if trimmed.chars().all(|c| c.is_ascii_digit())
            && (trimmed.len() == 6 || trimmed.len() == 8)
        {
            (
                trimmed[0..2].parse::<u32>().map_err(|_| invalid())?,
                trimmed[2..4].parse::<u32>().map_err(|_| invalid())?,
                &trimmed[4..],
            )
        } else {
            return Err(invalid());
        };

        // only the two digit forms are shifted into the 2000s
        let year = year_text.parse::<i32>().map_err(|_| invalid())?;
        let year = if year_text.len() == 2 { 2000 + year } else { year };

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Inverse of [`DateMode::Wire`] output.
    pub fn from_wire(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), WIRE_FORMAT)
            .map(Self)
            .map_err(|_| RatesError::InvalidDateFormat {
                input: input.to_string(),
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn format(&self, mode: DateMode) -> String {
        match mode {
            DateMode::Display => self.display(),
            DateMode::Wire => self.wire(),
        }
    }

    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }

    pub fn wire(&self) -> String {
        self.0.format(WIRE_FORMAT).to_string()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for DateValue {
    type Err = RatesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Parses `input` in any accepted shape and re-emits it in `mode`.
pub fn normalize_date(input: &str, mode: DateMode) -> Result<String> {
    DateValue::parse(input).map(|date| date.format(mode))
}

pub fn display_date(date: NaiveDate) -> String {
    DateValue(date).display()
}
