mod common;

use common::*;
use imena::{
    domain::{ContributionStatus, DateRange, LedgerEntryRequest, LedgerFilter, StatsGrouping},
    error::AppError,
};

#[tokio::test]
async fn rider_records_income_once_per_day() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    let record = ctx.income_service
        .create(&alice, entry(coop.id, date(2024, 1, 5), "100.00"))
        .await?;
    assert_eq!(record.amount.to_string(), "100.00");
    assert_eq!(record.rider.id, alice.id);
    assert_eq!(record.cooperative.name, "Kigali Moto");

    let summary = ctx.income_service.summary(&alice, &DateRange::default()).await?;
    assert_eq!(summary.total.to_string(), "100.00");

    // Same rider, cooperative and day conflicts whatever the amount.
    let duplicate = ctx.income_service
        .create(&alice, entry(coop.id, date(2024, 1, 5), "7.50"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn income_for_another_cooperative_is_rejected() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let home = cooperative(&ctx, "Home").await?;
    let other = cooperative(&ctx, "Other").await?;
    let alice = rider(&ctx, "+250700000001", home.id).await?;

    match ctx.income_service.create(&alice, entry(other.id, date(2024, 1, 5), "10")).await {
        Err(AppError::Validation(errors)) => {
            assert_eq!(
                errors.get("cooperative"),
                Some(&["You can only create income for your own cooperative.".to_string()][..])
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn missing_fields_are_reported_together() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    match ctx.contribution_service.create(&alice, LedgerEntryRequest::default()).await {
        Err(AppError::Validation(errors)) => {
            for field in ["cooperative", "date", "amount"] {
                assert_eq!(errors.get(field), Some(&["This field is required.".to_string()][..]));
            }
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn negative_and_overprecise_amounts_are_rejected() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    for amount in ["-1", "1.005"] {
        let result = ctx.income_service
            .create(&alice, entry(coop.id, date(2024, 1, 5), amount))
            .await;
        match result {
            Err(AppError::Validation(errors)) => assert!(errors.contains("amount")),
            other => panic!("expected validation error for {}, got {:?}", amount, other),
        }
    }

    Ok(())
}

#[tokio::test]
async fn only_riders_submit_ledger_entries() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let bob = admin(&ctx, "bob@imena.test", &[coop.id]).await?;

    let result = ctx.income_service
        .create(&bob, entry(coop.id, date(2024, 1, 5), "10"))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let result = ctx.contribution_service
        .create(&bob, entry(coop.id, date(2024, 1, 5), "10"))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn admin_verifies_contribution_exactly_once() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;
    let bob = admin(&ctx, "bob@imena.test", &[coop.id]).await?;

    let contribution = ctx.contribution_service
        .create(&alice, entry(coop.id, date(2024, 2, 1), "50.00"))
        .await?;
    assert_eq!(contribution.status, ContributionStatus::Pending);

    let verified = ctx.contribution_service.verify(&bob, contribution.id).await?;
    assert_eq!(verified.status, ContributionStatus::Verified);
    assert_eq!(verified.amount.to_string(), "50.00");

    match ctx.contribution_service.verify(&bob, contribution.id).await {
        Err(AppError::BadRequest(msg)) => {
            assert_eq!(msg, "Only PENDING contributions can be verified.")
        }
        other => panic!("expected bad request, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn verification_is_limited_to_the_cooperatives_admins() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let elsewhere = cooperative(&ctx, "Elsewhere").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;
    let stranger = admin(&ctx, "carol@imena.test", &[elsewhere.id]).await?;
    let root = superuser(&ctx).await?;

    let contribution = ctx.contribution_service
        .create(&alice, entry(coop.id, date(2024, 2, 1), "50.00"))
        .await?;

    // The stranger cannot even see it.
    let result = ctx.contribution_service.verify(&stranger, contribution.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The owner sees it but may not verify it.
    let result = ctx.contribution_service.verify(&alice, contribution.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let verified = ctx.contribution_service.verify(&root, contribution.id).await?;
    assert_eq!(verified.status, ContributionStatus::Verified);

    Ok(())
}

#[tokio::test]
async fn concurrent_verifications_have_one_winner() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;
    let bob = admin(&ctx, "bob@imena.test", &[coop.id]).await?;

    let contribution = ctx.contribution_service
        .create(&alice, entry(coop.id, date(2024, 2, 1), "50.00"))
        .await?;

    let (first, second) = tokio::join!(
        ctx.contribution_service.verify(&bob, contribution.id),
        ctx.contribution_service.verify(&bob, contribution.id),
    );

    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    Ok(())
}

#[tokio::test]
async fn stats_group_by_year_and_month() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    ctx.income_service.create(&alice, entry(coop.id, date(2023, 3, 1), "10")).await?;
    ctx.income_service.create(&alice, entry(coop.id, date(2024, 7, 1), "20")).await?;
    ctx.income_service.create(&alice, entry(coop.id, date(2024, 7, 9), "2.5")).await?;

    let yearly = ctx.income_service.stats(&alice, StatsGrouping::Year, None).await?;
    let yearly: Vec<(String, String)> = yearly
        .into_iter()
        .map(|p| (p.period, p.total.to_string()))
        .collect();
    assert_eq!(
        yearly,
        vec![
            ("2023".to_string(), "10.00".to_string()),
            ("2024".to_string(), "22.50".to_string()),
        ]
    );

    let monthly = ctx.income_service.stats(&alice, StatsGrouping::Month, Some(2024)).await?;
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].period, "2024-07");

    // The year filter is ignored for yearly grouping.
    let yearly = ctx.income_service.stats(&alice, StatsGrouping::Year, Some(2024)).await?;
    assert_eq!(yearly.len(), 2);

    Ok(())
}

#[tokio::test]
async fn list_filters_by_range_and_paginates() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;

    for day in 1..=5 {
        ctx.income_service.create(&alice, entry(coop.id, date(2024, 3, day), "10")).await?;
    }

    let range = DateRange::parse(Some("2024-03-02"), Some("2024-03-04"))?;
    let records = ctx.income_service
        .list(&alice, &LedgerFilter::new(range, None, None)?)
        .await?;
    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 4), date(2024, 3, 3), date(2024, 3, 2)]);

    let page = ctx.income_service
        .list(&alice, &LedgerFilter::new(DateRange::default(), Some(2), Some(1))?)
        .await?;
    let dates: Vec<_> = page.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 4), date(2024, 3, 3)]);

    let summary = ctx.income_service.summary(&alice, &range).await?;
    assert_eq!(summary.total.to_string(), "30.00");

    Ok(())
}

#[tokio::test]
async fn contributions_filter_by_status() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let coop = cooperative(&ctx, "Kigali Moto").await?;
    let alice = rider(&ctx, "+250700000001", coop.id).await?;
    let bob = admin(&ctx, "bob@imena.test", &[coop.id]).await?;

    let first = ctx.contribution_service
        .create(&alice, entry(coop.id, date(2024, 2, 1), "50"))
        .await?;
    ctx.contribution_service
        .create(&alice, entry(coop.id, date(2024, 2, 8), "50"))
        .await?;
    ctx.contribution_service.verify(&bob, first.id).await?;

    let pending = ctx.contribution_service
        .list(&bob, &LedgerFilter::default(), Some(ContributionStatus::Pending))
        .await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].date, date(2024, 2, 8));

    let all = ctx.contribution_service.list(&alice, &LedgerFilter::default(), None).await?;
    assert_eq!(all.len(), 2);

    Ok(())
}
