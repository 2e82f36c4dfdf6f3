use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{company::en::CompanyName, name::en::Name},
    Fake,
};
use imena::{
    auth::AuthService,
    domain::{Money, NewLedgerEntry, NewUser, Role},
    repository::{
        ContributionRepository, CooperativeRepository, IncomeRepository, SqliteContributionRepository,
        SqliteCooperativeRepository, SqliteIncomeRepository, SqliteUserRepository, UserRepository,
    },
};
use sqlx::sqlite::SqlitePoolOptions;

/// Fill a database with sample cooperatives, accounts and ledger rows.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://imena.db?mode=rwc")]
    database_url: String,

    #[arg(long, default_value = "admin@imena.local")]
    superuser_email: String,

    #[arg(long, default_value = "admin12345")]
    superuser_password: String,

    #[arg(long, default_value_t = 2)]
    cooperatives: usize,

    /// Riders created per cooperative.
    #[arg(long, default_value_t = 3)]
    riders: usize,

    /// Days of income history per rider.
    #[arg(long, default_value_t = 14)]
    days: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await
        .with_context(|| format!("connecting to {}", args.database_url))?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let cooperative_repo = SqliteCooperativeRepository::new(db_pool.clone());
    let income_repo = SqliteIncomeRepository::new(db_pool.clone());
    let contribution_repo = SqliteContributionRepository::new(db_pool.clone());

    let password_hash = AuthService::hash_password(&args.superuser_password).await?;
    user_repo.create(NewUser {
        email: Some(args.superuser_email.to_lowercase()),
        phone_number: None,
        full_name: "Imena Superuser".to_string(),
        password_hash: password_hash.clone(),
        role: Role::CooperativeAdmin,
        is_superuser: true,
        membership: None,
        administered: Vec::new(),
    }).await?;
    println!("  Created superuser ({} / {})", args.superuser_email, args.superuser_password);

    let today = Utc::now().date_naive();
    let mut phone_seq = 700_000_000u64;

    for c in 0..args.cooperatives {
        let name: String = CompanyName().fake();
        let cooperative = cooperative_repo.create(&format!("{} Riders", name), None).await?;

        let admin_email = format!("admin{}@imena.local", c + 1);
        user_repo.create(NewUser {
            email: Some(admin_email.clone()),
            phone_number: None,
            full_name: Name().fake(),
            password_hash: password_hash.clone(),
            role: Role::CooperativeAdmin,
            is_superuser: false,
            membership: None,
            administered: vec![cooperative.id],
        }).await?;
        println!("  Created cooperative \"{}\" administered by {}", cooperative.name, admin_email);

        for _ in 0..args.riders {
            phone_seq += 1;
            let rider = user_repo.create(NewUser {
                email: None,
                phone_number: Some(format!("+250{}", phone_seq)),
                full_name: Name().fake(),
                password_hash: password_hash.clone(),
                role: Role::Rider,
                is_superuser: false,
                membership: Some(cooperative.id),
                administered: Vec::new(),
            }).await?;
            cooperative_repo
                .toggle_membership_verification(cooperative.id, rider.id)
                .await?;

            for day in 0..args.days {
                let cents: i64 = (2_000..15_000).fake();
                income_repo.create(NewLedgerEntry {
                    rider_id: rider.id,
                    cooperative_id: cooperative.id,
                    date: today - Duration::days(day),
                    amount: Money::from_cents(cents),
                }).await?;
            }

            for week in 0..(args.days / 7) {
                let contribution = contribution_repo.create(NewLedgerEntry {
                    rider_id: rider.id,
                    cooperative_id: cooperative.id,
                    date: today - Duration::days(week * 7),
                    amount: Money::from_cents(5_000),
                }).await?;
                // Older contributions are already settled.
                if week > 0 {
                    contribution_repo.mark_verified(contribution.id).await?;
                }
            }
        }
        println!("  Added {} riders with {} days of income each", args.riders, args.days);
    }

    println!("Seeding complete.");
    Ok(())
}
