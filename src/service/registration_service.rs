use std::sync::Arc;

use subtle::ConstantTimeEq;
use validator::Validate;

use crate::{
    auth::AuthService,
    domain::{NewUser, RegisterRequest, Role, SignupRole, User},
    error::{FieldErrors, Result},
    repository::{CooperativeRepository, UserRepository},
};

pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    cooperatives: Arc<dyn CooperativeRepository>,
    /// Read once at startup; `None` disables administrator signup.
    invite_code: Option<String>,
}

impl RegistrationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cooperatives: Arc<dyn CooperativeRepository>,
        invite_code: Option<String>,
    ) -> Self {
        Self {
            users,
            cooperatives,
            invite_code,
        }
    }

    /// Creates a rider (with an unverified membership) or an administrator
    /// (added to every selected cooperative's admin set).
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let request = request.normalized();

        let mut errors = match request.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if request.password != request.confirm_password {
            errors.add("confirm_password", "Passwords do not match.");
        }

        let signup_role = match request.role.as_deref() {
            None => Some(SignupRole::default()),
            Some(role) => match role.parse::<SignupRole>() {
                Ok(role) => Some(role),
                Err(message) => {
                    errors.add("role", message);
                    None
                }
            },
        };

        let mut membership = None;
        let mut administered = Vec::new();

        match signup_role {
            None => {}
            Some(SignupRole::Rider) => {
                match request.cooperative_id {
                    None => errors.add("cooperative_id", "Riders must select a cooperative."),
                    Some(id) => {
                        if self.cooperatives.existing_ids(&[id]).await?.is_empty() {
                            errors.add(
                                "cooperative_id",
                                format!("Invalid pk \"{}\" - object does not exist.", id),
                            );
                        } else {
                            membership = Some(id);
                        }
                    }
                }
                if request.phone_number.is_none() {
                    errors.add("phone_number", "Phone number is required for riders.");
                }
            }
            Some(SignupRole::Administrator) => {
                if request.email.is_none() {
                    errors.add("email", "Email is required for administrators.");
                }

                let mut selected = request.cooperatives.clone();
                selected.sort_unstable();
                selected.dedup();
                if selected.is_empty() {
                    errors.add("cooperatives", "Administrators must select at least one cooperative.");
                } else {
                    let existing = self.cooperatives.existing_ids(&selected).await?;
                    for id in selected.iter().filter(|id| !existing.contains(id)) {
                        errors.add(
                            "cooperatives",
                            format!("Invalid pk \"{}\" - object does not exist.", id),
                        );
                    }
                    administered = existing;
                }

                if let Err(message) = self.check_invite_code(request.invite_code.as_deref()) {
                    errors.add("invite_code", message);
                }
            }
        }

        if let Some(email) = request.email.as_deref() {
            if self.users.find_by_email(email).await?.is_some() {
                errors.add("email", "A user with this email already exists.");
            }
        }
        if let Some(phone_number) = request.phone_number.as_deref() {
            if self.users.find_by_phone(phone_number).await?.is_some() {
                errors.add("phone_number", "A user with this phone number already exists.");
            }
        }

        errors.into_result()?;

        let role = Role::from(signup_role.unwrap_or_default());
        let password_hash = AuthService::hash_password(&request.password).await?;
        let user = self
            .users
            .create(NewUser {
                email: request.email,
                phone_number: request.phone_number,
                full_name: request.full_name,
                password_hash,
                role,
                is_superuser: false,
                membership,
                administered,
            })
            .await?;

        tracing::info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    fn check_invite_code(&self, provided: Option<&str>) -> std::result::Result<(), &'static str> {
        let Some(expected) = self.invite_code.as_deref() else {
            return Err("Administrator registration is currently disabled.");
        };
        let Some(provided) = provided else {
            return Err("Invite code is required for administrators.");
        };
        if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err("Invalid invite code.")
        }
    }
}
