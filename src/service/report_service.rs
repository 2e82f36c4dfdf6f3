use std::sync::Arc;

use crate::{
    access::Visibility,
    domain::{ContributionSummary, CooperativeIncomeTotal, DateRange, RiderIncomeTotal, User},
    error::Result,
    repository::ReportRepository,
};

/// Read-only aggregations, each scoped to what the actor may see.
pub struct ReportService {
    repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }

    pub async fn income_by_rider(&self, actor: &User, range: &DateRange) -> Result<Vec<RiderIncomeTotal>> {
        self.repo.income_by_rider(Visibility::for_user(actor), range).await
    }

    pub async fn income_by_cooperative(
        &self,
        actor: &User,
        range: &DateRange,
    ) -> Result<Vec<CooperativeIncomeTotal>> {
        self.repo.income_by_cooperative(Visibility::for_user(actor), range).await
    }

    pub async fn contributions_summary(&self, actor: &User, range: &DateRange) -> Result<ContributionSummary> {
        self.repo.contributions_summary(Visibility::for_user(actor), range).await
    }
}
