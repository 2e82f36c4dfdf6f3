use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use crate::access::Visibility;
use crate::domain::*;
use crate::error::{AppError, Result};

pub mod contribution_repository;
pub mod cooperative_repository;
pub mod income_repository;
pub mod report_repository;
pub mod user_repository;

pub use contribution_repository::SqliteContributionRepository;
pub use cooperative_repository::SqliteCooperativeRepository;
pub use income_repository::SqliteIncomeRepository;
pub use report_repository::SqliteReportRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the account together with its membership and admin links.
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>>;
    async fn password_hash(&self, id: i64) -> Result<Option<String>>;
}

#[async_trait]
pub trait CooperativeRepository: Send + Sync {
    /// Creates a cooperative, adding `creator` to its admin set when given.
    async fn create(&self, name: &str, creator: Option<i64>) -> Result<Cooperative>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Cooperative>>;
    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<Cooperative>>;
    async fn list_visible(&self, visibility: Visibility) -> Result<Vec<Cooperative>>;
    async fn list_choices(&self) -> Result<Vec<CooperativeChoice>>;
    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>>;
    async fn members(&self, cooperative_id: i64) -> Result<Vec<MemberSummary>>;
    async fn admins(&self, cooperative_id: i64) -> Result<Vec<AdminSummary>>;
    async fn is_admin(&self, cooperative_id: i64, user_id: i64) -> Result<bool>;
    async fn membership_for(&self, user_id: i64) -> Result<Option<CooperativeMembership>>;
    /// Flips `is_verified` in one statement. `None` when no such membership.
    async fn toggle_membership_verification(
        &self,
        cooperative_id: i64,
        user_id: i64,
    ) -> Result<Option<CooperativeMembership>>;
}

#[async_trait]
pub trait IncomeRepository: Send + Sync {
    /// Fails with `Conflict` when the rider already has a record for that
    /// cooperative and day.
    async fn create(&self, entry: NewLedgerEntry) -> Result<IncomeRecord>;
    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<IncomeRecord>>;
    async fn list(&self, visibility: Visibility, filter: &LedgerFilter) -> Result<Vec<IncomeRecord>>;
    async fn total(&self, visibility: Visibility, range: &DateRange) -> Result<Money>;
    async fn stats(
        &self,
        visibility: Visibility,
        grouping: StatsGrouping,
        year: Option<i32>,
    ) -> Result<Vec<StatPoint>>;
}

#[async_trait]
pub trait ContributionRepository: Send + Sync {
    async fn create(&self, entry: NewLedgerEntry) -> Result<Contribution>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Contribution>>;
    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<Contribution>>;
    async fn list(
        &self,
        visibility: Visibility,
        filter: &LedgerFilter,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<Contribution>>;
    /// PENDING → VERIFIED as a single conditional update. `false` when the row
    /// is missing or was not PENDING.
    async fn mark_verified(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn income_by_rider(&self, visibility: Visibility, range: &DateRange) -> Result<Vec<RiderIncomeTotal>>;
    async fn income_by_cooperative(
        &self,
        visibility: Visibility,
        range: &DateRange,
    ) -> Result<Vec<CooperativeIncomeTotal>>;
    async fn contributions_summary(&self, visibility: Visibility, range: &DateRange) -> Result<ContributionSummary>;
}

/// Maps a unique-constraint violation to `Conflict(message)`; other errors
/// stay database errors.
pub(crate) fn conflict_on_unique(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.to_string()),
        _ => AppError::from(err),
    }
}

/// Appends ` AND <alias>.date >= ? AND <alias>.date <= ?` for the bounds present.
pub(crate) fn push_date_range(qb: &mut QueryBuilder<'_, Sqlite>, alias: &'static str, range: &DateRange) {
    if let Some(from) = range.from {
        qb.push(format!(" AND {alias}.date >= ")).push_bind(from);
    }
    if let Some(to) = range.to {
        qb.push(format!(" AND {alias}.date <= ")).push_bind(to);
    }
}

pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, filter: &LedgerFilter) {
    match (filter.limit, filter.offset) {
        (None, None) => {}
        (limit, offset) => {
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
            qb.push(" LIMIT ").push_bind(limit.unwrap_or(-1));
            qb.push(" OFFSET ").push_bind(offset.unwrap_or(0));
        }
    }
}
