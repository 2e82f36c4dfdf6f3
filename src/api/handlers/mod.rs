pub mod auth;
pub mod contributions;
pub mod cooperatives;
pub mod income;
pub mod reports;
pub mod root;
pub mod users;

use serde::Deserialize;

use crate::{
    domain::{DateRange, LedgerFilter},
    error::Result,
};

/// Query string shared by the ledger list and report endpoints. Dates stay
/// strings here so a malformed one becomes a field error instead of a
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RangeParams {
    pub fn range(&self) -> Result<DateRange> {
        DateRange::parse(self.from.as_deref(), self.to.as_deref())
    }

    pub fn filter(&self) -> Result<LedgerFilter> {
        LedgerFilter::new(self.range()?, self.limit, self.offset)
    }
}
