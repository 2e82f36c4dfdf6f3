use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    access::Visibility,
    domain::{AdminSummary, Cooperative, CooperativeChoice, CooperativeMembership, MemberSummary},
    error::{AppError, Result},
    repository::CooperativeRepository,
};

#[derive(FromRow)]
struct CooperativeRow {
    id: i64,
    name: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<CooperativeRow> for Cooperative {
    fn from(row: CooperativeRow) -> Self {
        Cooperative {
            id: row.id,
            name: row.name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

pub struct SqliteCooperativeRepository {
    pool: SqlitePool,
}

impl SqliteCooperativeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn select_visible(visibility: Visibility) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(
            "SELECT c.id, c.name, c.created_at, c.updated_at FROM cooperatives c WHERE ",
        );
        visibility.push_cooperative_predicate(&mut qb, "c");
        qb
    }
}

#[async_trait]
impl CooperativeRepository for SqliteCooperativeRepository {
    async fn create(&self, name: &str, creator: Option<i64>) -> Result<Cooperative> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO cooperatives (name, created_at, updated_at) VALUES (?, ?, ?)"
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(user_id) = creator {
            sqlx::query("INSERT INTO cooperative_admins (cooperative_id, user_id) VALUES (?, ?)")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created cooperative".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Cooperative>> {
        let row = sqlx::query_as::<_, CooperativeRow>(
            "SELECT id, name, created_at, updated_at FROM cooperatives WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_visible(&self, id: i64, visibility: Visibility) -> Result<Option<Cooperative>> {
        let mut qb = Self::select_visible(visibility);
        qb.push(" AND c.id = ").push_bind(id);

        let row = qb
            .build_query_as::<CooperativeRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_visible(&self, visibility: Visibility) -> Result<Vec<Cooperative>> {
        let mut qb = Self::select_visible(visibility);
        qb.push(" ORDER BY c.name, c.id");

        let rows = qb
            .build_query_as::<CooperativeRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_choices(&self) -> Result<Vec<CooperativeChoice>> {
        let choices = sqlx::query_as::<_, CooperativeChoice>(
            "SELECT id, name FROM cooperatives ORDER BY name, id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM cooperatives WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let found = qb
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?;

        Ok(found)
    }

    async fn members(&self, cooperative_id: i64) -> Result<Vec<MemberSummary>> {
        let members = sqlx::query_as::<_, MemberSummary>(
            r#"
            SELECT u.id AS user_id, u.email, u.phone_number, m.is_verified
            FROM cooperative_memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.cooperative_id = ?
            ORDER BY u.id
            "#
        )
        .bind(cooperative_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn admins(&self, cooperative_id: i64) -> Result<Vec<AdminSummary>> {
        let admins = sqlx::query_as::<_, AdminSummary>(
            r#"
            SELECT u.id AS user_id, u.email, u.phone_number
            FROM cooperative_admins a
            JOIN users u ON u.id = a.user_id
            WHERE a.cooperative_id = ?
            ORDER BY u.id
            "#
        )
        .bind(cooperative_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }

    async fn is_admin(&self, cooperative_id: i64, user_id: i64) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cooperative_admins WHERE cooperative_id = ? AND user_id = ?"
        )
        .bind(cooperative_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn membership_for(&self, user_id: i64) -> Result<Option<CooperativeMembership>> {
        let membership = sqlx::query_as::<_, CooperativeMembership>(
            "SELECT id, user_id, cooperative_id, is_verified FROM cooperative_memberships WHERE user_id = ?"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn toggle_membership_verification(
        &self,
        cooperative_id: i64,
        user_id: i64,
    ) -> Result<Option<CooperativeMembership>> {
        let membership = sqlx::query_as::<_, CooperativeMembership>(
            r#"
            UPDATE cooperative_memberships
            SET is_verified = NOT is_verified
            WHERE cooperative_id = ? AND user_id = ?
            RETURNING id, user_id, cooperative_id, is_verified
            "#
        )
        .bind(cooperative_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }
}
