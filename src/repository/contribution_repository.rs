use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    access::Visibility,
    domain::{
        Contribution, ContributionStatus, CooperativeRef, LedgerFilter, Money, NewLedgerEntry,
        RiderRef,
    },
    error::{AppError, Result},
    repository::{push_date_range, push_page, ContributionRepository},
};

#[derive(FromRow)]
struct ContributionRow {
    id: i64,
    rider_id: i64,
    rider_email: Option<String>,
    cooperative_id: i64,
    cooperative_name: String,
    date: NaiveDate,
    amount_cents: i64,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const SELECT_CONTRIBUTION: &str = r#"
    SELECT t.id, t.rider_id, u.email AS rider_email,
           t.cooperative_id, c.name AS cooperative_name,
           t.date, t.amount_cents, t.status, t.created_at, t.updated_at
    FROM contributions t
    JOIN users u ON u.id = t.rider_id
    JOIN cooperatives c ON c.id = t.cooperative_id
    WHERE "#;

pub struct SqliteContributionRepository {
    pool: SqlitePool,
}

impl SqliteContributionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_contribution(row: ContributionRow) -> Result<Contribution> {
        Ok(Contribution {
            id: row.id,
            rider: RiderRef {
                id: row.rider_id,
                email: row.rider_email,
            },
            cooperative: CooperativeRef {
                id: row.cooperative_id,
                name: row.cooperative_name,
            },
            date: row.date,
            amount: Money::from_cents(row.amount_cents),
            status: row
                .status
                .parse::<ContributionStatus>()
                .map_err(AppError::Database)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn select_visible(visibility: Visibility) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(SELECT_CONTRIBUTION);
        visibility.push_ledger_predicate(&mut qb, "t");
        qb
    }
}

#[async_trait]
impl ContributionRepository for SqliteContributionRepository {
    async fn create(&self, entry: NewLedgerEntry) -> Result<Contribution> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO contributions (
                rider_id, cooperative_id, date, amount_cents, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(entry.rider_id)
        .bind(entry.cooperative_id)
        .bind(entry.date)
        .bind(entry.amount.cents())
        .bind(ContributionStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created contribution".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contribution>> {
        self.find_visible(id, Visibility::Unrestricted).await
    }

    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<Contribution>> {
        let mut qb = Self::select_visible(visibility);
        qb.push(" AND t.id = ").push_bind(id);

        let row = qb
            .build_query_as::<ContributionRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_contribution).transpose()
    }

    async fn list(
        &self,
        visibility: Visibility,
        filter: &LedgerFilter,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<Contribution>> {
        let mut qb = Self::select_visible(visibility);
        push_date_range(&mut qb, "t", &filter.range);
        if let Some(status) = status {
            qb.push(" AND t.status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");
        push_page(&mut qb, filter);

        let rows = qb
            .build_query_as::<ContributionRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_contribution).collect()
    }

    async fn mark_verified(&self, id: i64) -> Result<bool> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE contributions
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#
        )
        .bind(ContributionStatus::Verified.as_str())
        .bind(now)
        .bind(id)
        .bind(ContributionStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
