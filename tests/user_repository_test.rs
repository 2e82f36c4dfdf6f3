mod common;

use common::*;
use imena::{
    domain::{NewUser, Role},
    error::AppError,
};

fn account(email: Option<&str>, phone: Option<&str>) -> NewUser {
    NewUser {
        email: email.map(str::to_string),
        phone_number: phone.map(str::to_string),
        full_name: "Test User".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: Role::CooperativeAdmin,
        is_superuser: false,
        membership: None,
        administered: Vec::new(),
    }
}

#[tokio::test]
async fn email_lookup_ignores_case() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let user = ctx.user_repo.create(account(Some("ada@example.com"), None)).await?;

    let found = ctx.user_repo.find_by_email(" ADA@Example.com ").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let duplicate = ctx.user_repo.create(account(Some("Ada@EXAMPLE.com"), None)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn phone_lookup_is_exact() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let user = ctx.user_repo.create(account(None, Some("0788ABC"))).await?;

    let found = ctx.user_repo.find_by_phone("0788ABC").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert!(ctx.user_repo.find_by_phone("0788abc").await?.is_none());

    // The unique index on phone numbers is case-sensitive too.
    let other = ctx.user_repo.create(account(None, Some("0788abc"))).await?;
    assert_ne!(other.id, user.id);

    Ok(())
}
