use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in canonical `YYYY-MM-DD` form.
///
/// Only built through [`DateKey::parse`] or from a [`NaiveDate`], so the text
/// form is always zero-padded and lexical order matches chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse a canonical `YYYY-MM-DD` string. Unpadded forms like `2025-6-1`
    /// are rejected even though they name a real day.
    pub fn parse(s: &str) -> Result<DateKey, ValidationError> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| ValidationError::BadDate(s.to_string()))?;
        let key = DateKey(date);
        if key.to_string() != s {
            return Err(ValidationError::BadDate(s.to_string()));
        }
        Ok(key)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DateKey::parse(&s)
    }
}

impl From<DateKey> for String {
    fn from(d: DateKey) -> String {
        d.to_string()
    }
}
