use std::sync::Arc;

use crate::{
    access::Visibility,
    domain::{
        DateRange, IncomeRecord, IncomeSummary, LedgerEntryRequest, LedgerFilter, StatPoint,
        StatsGrouping, User,
    },
    error::{AppError, Result},
    repository::{CooperativeRepository, IncomeRepository},
    service::ledger,
};

pub struct IncomeService {
    repo: Arc<dyn IncomeRepository>,
    cooperatives: Arc<dyn CooperativeRepository>,
}

impl IncomeService {
    pub fn new(repo: Arc<dyn IncomeRepository>, cooperatives: Arc<dyn CooperativeRepository>) -> Self {
        Self { repo, cooperatives }
    }

    pub async fn create(&self, actor: &User, request: LedgerEntryRequest) -> Result<IncomeRecord> {
        let entry = ledger::validate_entry(actor, request, self.cooperatives.as_ref(), "income").await?;
        let record = self.repo.create(entry).await?;
        tracing::debug!("Rider {} recorded income {} for {}", actor.id, record.id, record.date);
        Ok(record)
    }

    pub async fn list(&self, actor: &User, filter: &LedgerFilter) -> Result<Vec<IncomeRecord>> {
        self.repo.list(Visibility::for_user(actor), filter).await
    }

    pub async fn get(&self, actor: &User, id: i64) -> Result<IncomeRecord> {
        self.repo
            .find_visible(id, Visibility::for_user(actor))
            .await?
            .ok_or_else(|| AppError::NotFound("Income record not found.".to_string()))
    }

    pub async fn summary(&self, actor: &User, range: &DateRange) -> Result<IncomeSummary> {
        let total = self.repo.total(Visibility::for_user(actor), range).await?;
        Ok(IncomeSummary { total })
    }

    /// `year` only narrows monthly grouping.
    pub async fn stats(
        &self,
        actor: &User,
        grouping: StatsGrouping,
        year: Option<i32>,
    ) -> Result<Vec<StatPoint>> {
        self.repo.stats(Visibility::for_user(actor), grouping, year).await
    }
}
