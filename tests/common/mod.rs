#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use imena::{
    config::{AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, Settings},
    domain::{Cooperative, LedgerEntryRequest, NewUser, Role, User},
    service::ServiceContext,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub const INVITE_CODE: &str = "let-me-in";
pub const PASSWORD: &str = "correct-horse";

pub fn test_settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 1,
            admin_invite_code: Some(INVITE_CODE.to_string()),
        },
        cors: CorsConfig::default(),
    }
}

/// A single connection that never expires, so the in-memory database lives
/// as long as the pool.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub async fn test_context() -> anyhow::Result<Arc<ServiceContext>> {
    test_context_with(&test_settings()).await
}

pub async fn test_context_with(settings: &Settings) -> anyhow::Result<Arc<ServiceContext>> {
    let pool = test_pool().await?;
    Ok(Arc::new(ServiceContext::new(pool, settings)))
}

pub async fn cooperative(ctx: &ServiceContext, name: &str) -> anyhow::Result<Cooperative> {
    Ok(ctx.cooperative_repo.create(name, None).await?)
}

pub async fn rider(ctx: &ServiceContext, phone: &str, cooperative_id: i64) -> anyhow::Result<User> {
    Ok(ctx.user_repo.create(NewUser {
        email: Some(format!("{}@riders.test", phone.trim_start_matches('+'))),
        phone_number: Some(phone.to_string()),
        full_name: format!("Rider {}", phone),
        password_hash: "not-a-real-hash".to_string(),
        role: Role::Rider,
        is_superuser: false,
        membership: Some(cooperative_id),
        administered: Vec::new(),
    }).await?)
}

pub async fn admin(ctx: &ServiceContext, email: &str, administered: &[i64]) -> anyhow::Result<User> {
    Ok(ctx.user_repo.create(NewUser {
        email: Some(email.to_string()),
        phone_number: None,
        full_name: format!("Admin {}", email),
        password_hash: "not-a-real-hash".to_string(),
        role: Role::CooperativeAdmin,
        is_superuser: false,
        membership: None,
        administered: administered.to_vec(),
    }).await?)
}

pub async fn superuser(ctx: &ServiceContext) -> anyhow::Result<User> {
    Ok(ctx.user_repo.create(NewUser {
        email: Some("root@imena.test".to_string()),
        phone_number: None,
        full_name: "Root".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: Role::CooperativeAdmin,
        is_superuser: true,
        membership: None,
        administered: Vec::new(),
    }).await?)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn entry(cooperative: i64, day: NaiveDate, amount: &str) -> LedgerEntryRequest {
    LedgerEntryRequest::new(cooperative, day, amount)
}
