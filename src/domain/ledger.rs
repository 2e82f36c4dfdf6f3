//! Types shared by the income and contribution ledgers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Money, MoneyError},
    error::{AppError, FieldErrors, Result},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderRef {
    pub id: i64,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooperativeRef {
    pub id: i64,
    pub name: String,
}

const BAD_DATE: &str = "Date has wrong format. Use YYYY-MM-DD.";

/// Client payload for a new income record or contribution. Any other field
/// (rider, status) is ignored; those are set by the server.
///
/// Fields stay raw JSON so that a value of the wrong type or format becomes a
/// field error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerEntryRequest {
    #[serde(default)]
    pub cooperative: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl LedgerEntryRequest {
    pub fn new(cooperative: i64, date: NaiveDate, amount: &str) -> Self {
        Self {
            cooperative: Some(Value::from(cooperative)),
            date: Some(Value::from(date.format("%Y-%m-%d").to_string())),
            amount: Some(Value::from(amount)),
        }
    }

    /// Parses each present field, recording a message under its name when it
    /// is malformed. Absent fields come back as `None` with no error.
    pub fn parse_fields(&self, errors: &mut FieldErrors) -> ParsedEntry {
        ParsedEntry {
            cooperative: present(self.cooperative.as_ref())
                .and_then(|v| record("cooperative", parse_pk(v), errors)),
            date: present(self.date.as_ref()).and_then(|v| record("date", parse_date(v), errors)),
            amount: present(self.amount.as_ref())
                .and_then(|v| record("amount", parse_amount(v), errors)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub cooperative: Option<i64>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
}

/// `null` counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn record<T>(field: &str, parsed: std::result::Result<T, String>, errors: &mut FieldErrors) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn parse_pk(value: &Value) -> std::result::Result<i64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| format!("Incorrect type. Expected pk value, received {}.", json_type(value)))
}

fn parse_date(value: &Value) -> std::result::Result<NaiveDate, String> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| BAD_DATE.to_string())
}

fn parse_amount(value: &Value) -> std::result::Result<Money, String> {
    let parsed = match value {
        Value::String(s) => s.parse::<Money>(),
        Value::Number(n) => n.to_string().parse::<Money>(),
        _ => Err(MoneyError::Invalid),
    };
    parsed.map_err(|e| e.to_string())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// A validated row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub rider_id: i64,
    pub cooperative_id: i64,
    pub date: NaiveDate,
    pub amount: Money,
}

/// Inclusive `[from, to]` date window; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parses `from`/`to` query values. Blank values mean "no bound".
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let mut errors = FieldErrors::new();
        let from = parse_bound("from", from, &mut errors);
        let to = parse_bound("to", to, &mut errors);
        errors.into_result()?;
        Ok(DateRange { from, to })
    }

}

fn parse_bound(field: &str, value: Option<&str>, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, BAD_DATE);
            None
        }
    }
}

/// Date window plus paging for ledger listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    pub range: DateRange,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl LedgerFilter {
    pub fn new(range: DateRange, limit: Option<i64>, offset: Option<i64>) -> Result<Self> {
        if limit.is_some_and(|l| l < 0) {
            return Err(AppError::field("limit", "Ensure this value is greater than or equal to 0."));
        }
        if offset.is_some_and(|o| o < 0) {
            return Err(AppError::field("offset", "Ensure this value is greater than or equal to 0."));
        }
        Ok(Self { range, limit, offset })
    }
}
