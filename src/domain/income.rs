use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CooperativeRef, Money, RiderRef};

/// A rider's earnings for one day in one cooperative. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub rider: RiderRef,
    pub cooperative: CooperativeRef,
    pub date: NaiveDate,
    pub amount: Money,
}

/// Period size for `income/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsGrouping {
    #[default]
    Month,
    Year,
}

impl StatsGrouping {
    /// `strftime` pattern producing the period label.
    pub fn strftime_pattern(&self) -> &'static str {
        match self {
            StatsGrouping::Month => "%Y-%m",
            StatsGrouping::Year => "%Y",
        }
    }
}

impl FromStr for StatsGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(StatsGrouping::Month),
            "year" => Ok(StatsGrouping::Year),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatPoint {
    pub period: String,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeSummary {
    pub total: Money,
}
