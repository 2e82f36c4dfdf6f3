mod common;

use common::*;
use imena::error::AppError;

#[tokio::test]
async fn admin_creates_cooperative_and_becomes_its_admin() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let bob = admin(&ctx, "bob@imena.test", &[]).await?;

    let detail = ctx.cooperative_service.create(&bob, "  Nyamirambo Riders ").await?;
    assert_eq!(detail.cooperative.name, "Nyamirambo Riders");
    assert_eq!(detail.admins.len(), 1);
    assert_eq!(detail.admins[0].user_id, bob.id);
    assert!(ctx.cooperative_repo.is_admin(detail.cooperative.id, bob.id).await?);

    Ok(())
}

#[tokio::test]
async fn riders_cannot_create_cooperatives() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "X").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    let result = ctx.cooperative_service.create(&alice, "Mine").await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn blank_cooperative_name_is_rejected() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let root = superuser(&ctx).await?;

    match ctx.cooperative_service.create(&root, "   ").await {
        Err(AppError::Validation(errors)) => assert!(errors.contains("name")),
        other => panic!("expected validation error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn verify_member_toggles_each_call() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "X").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;
    let bob = admin(&ctx, "bob@imena.test", &[coop.id]).await?;

    let first = ctx.cooperative_service.verify_member(&bob, coop.id, alice.id).await?;
    assert!(first.is_verified);
    let second = ctx.cooperative_service.verify_member(&bob, coop.id, alice.id).await?;
    assert!(!second.is_verified);

    Ok(())
}

#[tokio::test]
async fn verify_member_requires_administering_the_cooperative() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let x = cooperative(&ctx, "X").await?;
    let y = cooperative(&ctx, "Y").await?;
    let alice = rider(&ctx, "+250700000001", x.id).await?;
    let other_admin = admin(&ctx, "carol@imena.test", &[y.id]).await?;
    let root = superuser(&ctx).await?;

    let result = ctx.cooperative_service.verify_member(&other_admin, x.id, alice.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let result = ctx.cooperative_service.verify_member(&alice, x.id, alice.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // Alice is not a member of Y.
    let result = ctx.cooperative_service.verify_member(&root, y.id, alice.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let membership = ctx.cooperative_service.verify_member(&root, x.id, alice.id).await?;
    assert!(membership.is_verified);

    Ok(())
}

#[tokio::test]
async fn signup_choices_are_sorted_and_survive_storage_failure() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    cooperative(&ctx, "Zeta").await?;
    cooperative(&ctx, "Alpha").await?;

    let names: Vec<String> = ctx.cooperative_service
        .signup_choices()
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);

    ctx.db_pool.close().await;
    assert!(ctx.cooperative_service.signup_choices().await.is_empty());

    Ok(())
}
