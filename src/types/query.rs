use super::{Year, YearError};
use regex::Regex;
use std::{convert::TryFrom, sync::OnceLock};

/// An inclusive year range. The parser does not check that `low <= high`; that is up to
/// whoever answers the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub low: Year,
    pub high: Year,
}

impl Query {
    pub fn is_ordered(&self) -> bool {
        self.low <= self.high
    }
}

fn query_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([0-9]{1,4})\s+([0-9]{1,4})\s*$").expect("query line pattern compiles")
    })
}

impl TryFrom<&str> for Query {
    type Error = QueryLineError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let caps = query_line_regex()
            .captures(line)
            .ok_or(QueryLineError::NotQueryShaped)?;

        // The shape allows any 1-4 digits so that "0840 1847" is still recognised as a
        // query, just a broken one.
        Ok(Query {
            low: caps[1].parse()?,
            high: caps[2].parse()?,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueryLineError {
    #[error("line is not two whitespace-separated years")]
    NotQueryShaped,
    #[error(transparent)]
    InvalidYear(#[from] YearError),
}
