use std::sync::Arc;

use crate::{
    access::{policy, Visibility},
    domain::{Cooperative, CooperativeChoice, CooperativeDetail, CooperativeMembership, User},
    error::{AppError, Result},
    repository::CooperativeRepository,
};

pub struct CooperativeService {
    repo: Arc<dyn CooperativeRepository>,
}

impl CooperativeService {
    pub fn new(repo: Arc<dyn CooperativeRepository>) -> Self {
        Self { repo }
    }

    /// The creator becomes the first administrator.
    pub async fn create(&self, actor: &User, name: &str) -> Result<CooperativeDetail> {
        policy::may_create_cooperative(actor)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::field("name", "This field may not be blank."));
        }
        if name.chars().count() > 255 {
            return Err(AppError::field("name", "Ensure this field has no more than 255 characters."));
        }

        let cooperative = self.repo.create(name, Some(actor.id)).await?;
        tracing::info!("User {} created cooperative {} ({})", actor.id, cooperative.id, cooperative.name);

        self.detail(cooperative).await
    }

    pub async fn list(&self, actor: &User) -> Result<Vec<CooperativeDetail>> {
        let cooperatives = self.repo.list_visible(Visibility::for_user(actor)).await?;

        let mut details = Vec::with_capacity(cooperatives.len());
        for cooperative in cooperatives {
            details.push(self.detail(cooperative).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, actor: &User, id: i64) -> Result<CooperativeDetail> {
        let cooperative = self
            .repo
            .find_visible(id, Visibility::for_user(actor))
            .await?
            .ok_or_else(|| AppError::NotFound("Cooperative not found.".to_string()))?;

        self.detail(cooperative).await
    }

    /// Feeds the public signup form, so it never fails: errors are logged and
    /// an empty list is returned.
    pub async fn signup_choices(&self) -> Vec<CooperativeChoice> {
        match self.repo.list_choices().await {
            Ok(choices) => choices,
            Err(e) => {
                tracing::warn!("Failed to load cooperative choices: {}", e);
                Vec::new()
            }
        }
    }

    /// Flips the verification flag of `member_id`'s membership in `cooperative_id`.
    pub async fn verify_member(
        &self,
        actor: &User,
        cooperative_id: i64,
        member_id: i64,
    ) -> Result<CooperativeMembership> {
        let administers = self.repo.is_admin(cooperative_id, actor.id).await?;
        policy::may_verify_members(actor, administers)?;

        let membership = self
            .repo
            .toggle_membership_verification(cooperative_id, member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found.".to_string()))?;

        tracing::info!(
            "User {} set membership of user {} in cooperative {} to verified={}",
            actor.id,
            member_id,
            cooperative_id,
            membership.is_verified
        );
        Ok(membership)
    }

    async fn detail(&self, cooperative: Cooperative) -> Result<CooperativeDetail> {
        let members = self.repo.members(cooperative.id).await?;
        let admins = self.repo.admins(cooperative.id).await?;
        Ok(CooperativeDetail {
            cooperative,
            members,
            admins,
        })
    }
}
