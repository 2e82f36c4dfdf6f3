use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewUser, Role, User},
    error::{AppError, Result},
    repository::{conflict_on_unique, UserRepository},
};

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: Option<String>,
    phone_number: Option<String>,
    full_name: String,
    role: String,
    is_superuser: bool,
    is_active: bool,
    created_at: NaiveDateTime,
}

const USER_COLUMNS: &str =
    "id, email, phone_number, full_name, role, is_superuser, is_active, created_at";

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            id: row.id,
            email: row.email,
            phone_number: row.phone_number,
            full_name: row.full_name,
            role: row.role.parse::<Role>().map_err(AppError::Database)?,
            is_superuser: row.is_superuser,
            is_active: row.is_active,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    /// `predicate` is a fixed SQL fragment with one placeholder.
    async fn find_one(&self, predicate: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO users (
                email, phone_number, full_name, password_hash,
                role, is_superuser, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            "#
        )
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_superuser)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(conflict_on_unique("A user with this email or phone number already exists."))?
        .last_insert_rowid();

        if let Some(cooperative_id) = user.membership {
            sqlx::query(
                "INSERT INTO cooperative_memberships (user_id, cooperative_id, is_verified) VALUES (?, ?, 0)"
            )
            .bind(id)
            .bind(cooperative_id)
            .execute(&mut *tx)
            .await?;
        }

        for cooperative_id in &user.administered {
            sqlx::query(
                "INSERT OR IGNORE INTO cooperative_admins (cooperative_id, user_id) VALUES (?, ?)"
            )
            .bind(cooperative_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one("email = ? COLLATE NOCASE", email.trim()).await
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        self.find_one("phone_number = ?", phone_number.trim()).await
    }

    async fn password_hash(&self, id: i64) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash)
    }
}
