//! Mutation checks. Each returns `Forbidden` with the message sent to the
//! client. Superusers pass the administrative checks.

use crate::{
    domain::User,
    error::{AppError, Result},
};

/// Income records and contributions are created by riders only.
pub fn may_create_ledger_entry(actor: &User) -> Result<()> {
    if actor.is_rider() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only riders can submit records.".to_string()))
    }
}

pub fn may_create_cooperative(actor: &User) -> Result<()> {
    if actor.is_superuser || actor.is_cooperative_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only cooperative administrators can create cooperatives.".to_string(),
        ))
    }
}

/// `administers` tells whether the actor is in the target cooperative's admin set.
pub fn may_verify_members(actor: &User, administers: bool) -> Result<()> {
    if actor.is_superuser {
        return Ok(());
    }
    if !actor.is_cooperative_admin() {
        return Err(AppError::Forbidden(
            "Only cooperative administrators can verify members.".to_string(),
        ));
    }
    if !administers {
        return Err(AppError::Forbidden(
            "You do not administer this cooperative.".to_string(),
        ));
    }
    Ok(())
}

pub fn may_verify_contribution(actor: &User, administers: bool) -> Result<()> {
    if actor.is_superuser || administers {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only administrators of this cooperative can verify contributions.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use chrono::Utc;

    fn user(role: Role, is_superuser: bool) -> User {
        User {
            id: 1,
            email: None,
            phone_number: None,
            full_name: String::new(),
            role,
            is_superuser,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ledger_entries_are_rider_only() {
        assert!(may_create_ledger_entry(&user(Role::Rider, false)).is_ok());
        assert!(matches!(
            may_create_ledger_entry(&user(Role::CooperativeAdmin, false)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn cooperative_creation_is_admin_only() {
        assert!(may_create_cooperative(&user(Role::CooperativeAdmin, false)).is_ok());
        assert!(may_create_cooperative(&user(Role::Rider, true)).is_ok());
        assert!(may_create_cooperative(&user(Role::Rider, false)).is_err());
    }

    #[test]
    fn member_verification_needs_role_and_admin_relation() {
        assert!(may_verify_members(&user(Role::CooperativeAdmin, false), true).is_ok());
        assert!(may_verify_members(&user(Role::CooperativeAdmin, false), false).is_err());
        assert!(may_verify_members(&user(Role::Rider, false), true).is_err());
        assert!(may_verify_members(&user(Role::Rider, true), false).is_ok());
    }

    #[test]
    fn contribution_verification_follows_admin_relation() {
        assert!(may_verify_contribution(&user(Role::CooperativeAdmin, false), true).is_ok());
        assert!(may_verify_contribution(&user(Role::CooperativeAdmin, false), false).is_err());
        assert!(may_verify_contribution(&user(Role::Rider, true), false).is_ok());
    }
}
