use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    access::Visibility,
    domain::{ContributionSummary, CooperativeIncomeTotal, DateRange, Money, RiderIncomeTotal},
    error::Result,
    repository::{push_date_range, ReportRepository},
};

pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn income_by_rider(&self, visibility: Visibility, range: &DateRange) -> Result<Vec<RiderIncomeTotal>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT i.rider_id, u.email, i.cooperative_id, c.name, SUM(i.amount_cents)
            FROM income_records i
            JOIN users u ON u.id = i.rider_id
            JOIN cooperatives c ON c.id = i.cooperative_id
            WHERE "#,
        );
        visibility.push_ledger_predicate(&mut qb, "i");
        push_date_range(&mut qb, "i", range);
        qb.push(" GROUP BY i.rider_id, u.email, i.cooperative_id, c.name ORDER BY i.rider_id, i.cooperative_id");

        let rows = qb
            .build_query_as::<(i64, Option<String>, i64, String, i64)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(rider_id, rider_email, cooperative_id, cooperative_name, cents)| RiderIncomeTotal {
                rider_id,
                rider_email,
                cooperative_id,
                cooperative_name,
                total: Money::from_cents(cents),
            })
            .collect())
    }

    async fn income_by_cooperative(
        &self,
        visibility: Visibility,
        range: &DateRange,
    ) -> Result<Vec<CooperativeIncomeTotal>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT i.cooperative_id, c.name, SUM(i.amount_cents)
            FROM income_records i
            JOIN cooperatives c ON c.id = i.cooperative_id
            WHERE "#,
        );
        visibility.push_ledger_predicate(&mut qb, "i");
        push_date_range(&mut qb, "i", range);
        qb.push(" GROUP BY i.cooperative_id, c.name ORDER BY i.cooperative_id");

        let rows = qb
            .build_query_as::<(i64, String, i64)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(cooperative_id, cooperative_name, cents)| CooperativeIncomeTotal {
                cooperative_id,
                cooperative_name,
                total: Money::from_cents(cents),
            })
            .collect())
    }

    async fn contributions_summary(&self, visibility: Visibility, range: &DateRange) -> Result<ContributionSummary> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                COALESCE(SUM(t.amount_cents), 0),
                COUNT(t.id),
                COALESCE(SUM(CASE WHEN t.status = 'PENDING' THEN t.amount_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN t.status = 'PENDING' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN t.status = 'VERIFIED' THEN t.amount_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN t.status = 'VERIFIED' THEN 1 ELSE 0 END), 0)
            FROM contributions t
            WHERE "#,
        );
        visibility.push_ledger_predicate(&mut qb, "t");
        push_date_range(&mut qb, "t", range);

        let (total, total_count, pending, pending_count, verified, verified_count) = qb
            .build_query_as::<(i64, i64, i64, i64, i64, i64)>()
            .fetch_one(&self.pool)
            .await?;

        Ok(ContributionSummary {
            total_amount: Money::from_cents(total),
            total_count,
            pending_amount: Money::from_cents(pending),
            pending_count,
            verified_amount: Money::from_cents(verified),
            verified_count,
        })
    }
}
