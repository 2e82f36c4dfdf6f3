pub mod contribution_service;
pub mod cooperative_service;
pub mod income_service;
pub mod ledger;
pub mod registration_service;
pub mod report_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::AuthService;
use crate::config::Settings;
use crate::repository::*;
use contribution_service::ContributionService;
use cooperative_service::CooperativeService;
use income_service::IncomeService;
use registration_service::RegistrationService;
use report_service::ReportService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub cooperative_repo: Arc<dyn CooperativeRepository>,
    pub income_repo: Arc<dyn IncomeRepository>,
    pub contribution_repo: Arc<dyn ContributionRepository>,
    pub report_repo: Arc<dyn ReportRepository>,
    pub auth_service: Arc<AuthService>,
    pub registration_service: Arc<RegistrationService>,
    pub cooperative_service: Arc<CooperativeService>,
    pub income_service: Arc<IncomeService>,
    pub contribution_service: Arc<ContributionService>,
    pub report_service: Arc<ReportService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, settings: &Settings) -> Self {
        // Create repositories
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let cooperative_repo: Arc<dyn CooperativeRepository> =
            Arc::new(SqliteCooperativeRepository::new(db_pool.clone()));
        let income_repo: Arc<dyn IncomeRepository> = Arc::new(SqliteIncomeRepository::new(db_pool.clone()));
        let contribution_repo: Arc<dyn ContributionRepository> =
            Arc::new(SqliteContributionRepository::new(db_pool.clone()));
        let report_repo: Arc<dyn ReportRepository> = Arc::new(SqliteReportRepository::new(db_pool.clone()));

        // Create services
        let auth_service = Arc::new(AuthService::new(user_repo.clone(), &settings.auth));
        let registration_service = Arc::new(RegistrationService::new(
            user_repo.clone(),
            cooperative_repo.clone(),
            settings.auth.invite_code().map(str::to_string),
        ));
        let cooperative_service = Arc::new(CooperativeService::new(cooperative_repo.clone()));
        let income_service = Arc::new(IncomeService::new(income_repo.clone(), cooperative_repo.clone()));
        let contribution_service = Arc::new(ContributionService::new(
            contribution_repo.clone(),
            cooperative_repo.clone(),
        ));
        let report_service = Arc::new(ReportService::new(report_repo.clone()));

        Self {
            user_repo,
            cooperative_repo,
            income_repo,
            contribution_repo,
            report_repo,
            auth_service,
            registration_service,
            cooperative_service,
            income_service,
            contribution_service,
            report_service,
            db_pool,
        }
    }
}
