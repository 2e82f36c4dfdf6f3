use serde::Serialize;

use crate::domain::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderIncomeTotal {
    pub rider_id: i64,
    pub rider_email: Option<String>,
    pub cooperative_id: i64,
    pub cooperative_name: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooperativeIncomeTotal {
    pub cooperative_id: i64,
    pub cooperative_name: String,
    pub total: Money,
}

/// Totals over the visible contributions. Every field is zero, never absent,
/// when nothing matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContributionSummary {
    pub total_amount: Money,
    pub total_count: i64,
    pub pending_amount: Money,
    pub pending_count: i64,
    pub verified_amount: Money,
    pub verified_count: i64,
}

/// Wrapper for tabular reports: `{"results": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRows<T> {
    pub results: Vec<T>,
}
