use super::{Price, PriceError};
use regex::Regex;
use std::{convert::TryFrom, str::FromStr, sync::OnceLock};

// A "type-safe" year. Only 1-9999 written without a leading zero is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(pub u16);

impl FromStr for Year {
    type Err = YearError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() || token.len() > 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(YearError::NotAYear(token.into()));
        }
        if token.starts_with('0') {
            return Err(YearError::LeadingZero(token.into()));
        }

        token
            .parse::<u16>()
            .map(Year)
            .map_err(|_| YearError::NotAYear(token.into()))
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum YearError {
    #[error("\"{0}\" is not a year of 1 to 4 digits")]
    NotAYear(String),
    #[error("year \"{0}\" has a leading zero")]
    LeadingZero(String),
}

/// One stamp entry. Built only through `TryFrom<&str>`, so every field has already been
/// through the record layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: Year,
    pub office: String,
    pub price: Price,
    pub name: String,
}

fn record_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matched against whitespace-normalized text, so single spaces are enough here. The
    // name is lazy: the first price/year pair after it wins and the rest is office.
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<name>.+?) (?P<price>[0-9]*[.,]?[0-9]+) (?P<year>[1-9][0-9]{0,3}) (?P<office>.+)$",
        )
        .expect("record line pattern compiles")
    })
}

/// Collapse every whitespace run to one space and drop it at both ends.
fn normalize_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl TryFrom<&str> for Record {
    type Error = RecordLineError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let normalized = normalize_whitespace(line);
        let caps = record_line_regex()
            .captures(&normalized)
            .ok_or(RecordLineError::Layout)?;

        Ok(Record {
            year: caps["year"].parse()?,
            office: caps["office"].to_string(),
            price: caps["price"].parse()?,
            name: caps["name"].to_string(),
        })
    }
}

/// Returned when a line cannot be turned into a `Record`. Only `Layout` is expected in
/// practice; the others mean the layout accepted a field that then failed to convert.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordLineError {
    #[error("line does not have the \"name price year office\" layout")]
    Layout,
    #[error(transparent)]
    Year(#[from] YearError),
    #[error(transparent)]
    Price(#[from] PriceError),
}
