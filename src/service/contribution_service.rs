use std::sync::Arc;

use crate::{
    access::{policy, Visibility},
    domain::{Contribution, ContributionStatus, LedgerEntryRequest, LedgerFilter, User},
    error::{AppError, Result},
    repository::{ContributionRepository, CooperativeRepository},
    service::ledger,
};

const ONLY_PENDING: &str = "Only PENDING contributions can be verified.";

pub struct ContributionService {
    repo: Arc<dyn ContributionRepository>,
    cooperatives: Arc<dyn CooperativeRepository>,
}

impl ContributionService {
    pub fn new(repo: Arc<dyn ContributionRepository>, cooperatives: Arc<dyn CooperativeRepository>) -> Self {
        Self { repo, cooperatives }
    }

    /// Always stored as PENDING.
    pub async fn create(&self, actor: &User, request: LedgerEntryRequest) -> Result<Contribution> {
        let entry =
            ledger::validate_entry(actor, request, self.cooperatives.as_ref(), "contributions").await?;
        let contribution = self.repo.create(entry).await?;
        tracing::debug!("Rider {} submitted contribution {}", actor.id, contribution.id);
        Ok(contribution)
    }

    pub async fn list(
        &self,
        actor: &User,
        filter: &LedgerFilter,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<Contribution>> {
        self.repo.list(Visibility::for_user(actor), filter, status).await
    }

    pub async fn get(&self, actor: &User, id: i64) -> Result<Contribution> {
        self.repo
            .find_visible(id, Visibility::for_user(actor))
            .await?
            .ok_or_else(|| AppError::NotFound("Contribution not found.".to_string()))
    }

    /// PENDING → VERIFIED by an administrator of the contribution's cooperative.
    pub async fn verify(&self, actor: &User, id: i64) -> Result<Contribution> {
        let contribution = self.get(actor, id).await?;

        let administers = self
            .cooperatives
            .is_admin(contribution.cooperative.id, actor.id)
            .await?;
        policy::may_verify_contribution(actor, administers)?;

        if contribution.status != ContributionStatus::Pending {
            return Err(AppError::BadRequest(ONLY_PENDING.to_string()));
        }

        // A concurrent verification may have won since the read above.
        if !self.repo.mark_verified(id).await? {
            return Err(AppError::BadRequest(ONLY_PENDING.to_string()));
        }

        tracing::info!("User {} verified contribution {}", actor.id, id);

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contribution not found.".to_string()))
    }
}
