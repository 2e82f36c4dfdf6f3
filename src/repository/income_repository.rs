use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    access::Visibility,
    domain::{
        CooperativeRef, DateRange, IncomeRecord, LedgerFilter, Money, NewLedgerEntry, RiderRef,
        StatPoint, StatsGrouping,
    },
    error::{AppError, Result},
    repository::{conflict_on_unique, push_date_range, push_page, IncomeRepository},
};

#[derive(FromRow)]
struct IncomeRow {
    id: i64,
    rider_id: i64,
    rider_email: Option<String>,
    cooperative_id: i64,
    cooperative_name: String,
    date: NaiveDate,
    amount_cents: i64,
}

impl From<IncomeRow> for IncomeRecord {
    fn from(row: IncomeRow) -> Self {
        IncomeRecord {
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
        }
    }
}

const SELECT_INCOME: &str = r#"
    SELECT i.id, i.rider_id, u.email AS rider_email,
           i.cooperative_id, c.name AS cooperative_name,
           i.date, i.amount_cents
    FROM income_records i
    JOIN users u ON u.id = i.rider_id
    JOIN cooperatives c ON c.id = i.cooperative_id
    WHERE "#;

pub struct SqliteIncomeRepository {
    pool: SqlitePool,
}

impl SqliteIncomeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn select_visible(visibility: Visibility) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(SELECT_INCOME);
        visibility.push_ledger_predicate(&mut qb, "i");
        qb
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<IncomeRecord>> {
        self.find_visible(id, Visibility::Unrestricted).await
    }
}

#[async_trait]
impl IncomeRepository for SqliteIncomeRepository {
    async fn create(&self, entry: NewLedgerEntry) -> Result<IncomeRecord> {
        let id = sqlx::query(
            r#"
            INSERT INTO income_records (rider_id, cooperative_id, date, amount_cents)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(entry.rider_id)
        .bind(entry.cooperative_id)
        .bind(entry.date)
        .bind(entry.amount.cents())
        .execute(&self.pool)
        .await
        .map_err(conflict_on_unique(
            "You already have an income record for this cooperative and date.",
        ))?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created income record".to_string())
        })
    }

    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<IncomeRecord>> {
        let mut qb = Self::select_visible(visibility);
        qb.push(" AND i.id = ").push_bind(id);

        let row = qb
            .build_query_as::<IncomeRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, visibility: Visibility, filter: &LedgerFilter) -> Result<Vec<IncomeRecord>> {
        let mut qb = Self::select_visible(visibility);
        push_date_range(&mut qb, "i", &filter.range);
        qb.push(" ORDER BY i.date DESC, i.rider_id, i.id");
        push_page(&mut qb, filter);

        let rows = qb
            .build_query_as::<IncomeRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn total(&self, visibility: Visibility, range: &DateRange) -> Result<Money> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT COALESCE(SUM(i.amount_cents), 0) FROM income_records i WHERE ",
        );
        visibility.push_ledger_predicate(&mut qb, "i");
        push_date_range(&mut qb, "i", range);

        let cents = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_cents(cents))
    }

    async fn stats(
        &self,
        visibility: Visibility,
        grouping: StatsGrouping,
        year: Option<i32>,
    ) -> Result<Vec<StatPoint>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT strftime('{}', i.date) AS period, SUM(i.amount_cents) AS total_cents \
             FROM income_records i WHERE ",
            grouping.strftime_pattern()
        ));
        visibility.push_ledger_predicate(&mut qb, "i");
        if let (StatsGrouping::Month, Some(year)) = (grouping, year) {
            qb.push(" AND strftime('%Y', i.date) = ")
                .push_bind(format!("{:04}", year));
        }
        qb.push(" GROUP BY period ORDER BY period");

        let rows = qb
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(period, cents)| StatPoint {
                period,
                total: Money::from_cents(cents),
            })
            .collect())
    }
}
