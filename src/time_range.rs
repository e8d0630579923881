//! Selectable look-back windows and their Datastream date expressions.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneYear,
        TimeRange::TwoYears,
        TimeRange::ThreeYears,
        TimeRange::FiveYears,
    ];

    /// Parse a selector token, rejecting anything outside `1Y/2Y/3Y/5Y`.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "1Y" => Ok(TimeRange::OneYear),
            "2Y" => Ok(TimeRange::TwoYears),
            "3Y" => Ok(TimeRange::ThreeYears),
            "5Y" => Ok(TimeRange::FiveYears),
            other => Err(DashboardError::InvalidArgument(format!(
                "Unknown time range: {}",
                other
            ))),
        }
    }

    /// Parse a selector token, falling back to one year when it is not recognized.
    pub fn resolve(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|_| {
            tracing::debug!(token, "unrecognized time range, using 1Y");
            TimeRange::OneYear
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            TimeRange::OneYear => "1Y",
            TimeRange::TwoYears => "2Y",
            TimeRange::ThreeYears => "3Y",
            TimeRange::FiveYears => "5Y",
        }
    }

    pub fn years(self) -> i32 {
        match self {
            TimeRange::OneYear => 1,
            TimeRange::TwoYears => 2,
            TimeRange::ThreeYears => 3,
            TimeRange::FiveYears => 5,
        }
    }

    /// Relative start date understood by Datastream (e.g. `-2Y`).
    pub fn start_expression(self) -> String {
        format!("-{}Y", self.years())
    }

    /// Calendar date `years()` before `end`. 29 February maps to 28 February.
    pub fn start_date(self, end: NaiveDate) -> NaiveDate {
        let year = end.year() - self.years();
        NaiveDate::from_ymd_opt(year, end.month(), end.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, end.month(), 28))
            .unwrap_or(end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
