use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Business classification of an account. Not a permission grant on its own:
/// `User::is_superuser` overrides every role-based rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Rider,
    CooperativeAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Rider => "RIDER",
            Role::CooperativeAdmin => "COOPERATIVE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RIDER" => Ok(Role::Rider),
            "COOPERATIVE_ADMIN" => Ok(Role::CooperativeAdmin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// Role vocabulary of the public signup form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignupRole {
    #[default]
    Rider,
    Administrator,
}

impl FromStr for SignupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rider" => Ok(SignupRole::Rider),
            "administrator" => Ok(SignupRole::Administrator),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

impl From<SignupRole> for Role {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::Rider => Role::Rider,
            SignupRole::Administrator => Role::CooperativeAdmin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_rider(&self) -> bool {
        self.role == Role::Rider
    }

    pub fn is_cooperative_admin(&self) -> bool {
        self.role == Role::CooperativeAdmin
    }

}

/// Email, falling back to phone number, for listings that show one contact.
pub(crate) fn contact_of(email: Option<&str>, phone_number: Option<&str>) -> String {
    email.or(phone_number).unwrap_or_default().to_string()
}

/// Everything needed to insert an account and its cooperative links in one go.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_superuser: bool,
    /// Cooperative the rider joins (unverified).
    pub membership: Option<i64>,
    /// Cooperatives whose admin set the account joins.
    pub administered: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub full_name: String,
    /// `"rider"` (the default) or `"administrator"`; checked during registration.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub cooperative_id: Option<i64>,
    #[serde(default)]
    pub cooperatives: Vec<i64>,
    #[serde(default)]
    pub invite_code: Option<String>,
}

impl RegisterRequest {
    /// Trims input and turns blank optional fields into `None`. Emails are
    /// stored lower-cased.
    pub fn normalized(mut self) -> Self {
        self.email = non_blank(self.email).map(|e| e.to_lowercase());
        self.phone_number = non_blank(self.phone_number);
        self.invite_code = non_blank(self.invite_code);
        self.role = non_blank(self.role);
        self.full_name = self.full_name.trim().to_string();
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_roles_map_to_internal_roles() {
        assert_eq!(Role::from(SignupRole::Rider), Role::Rider);
        assert_eq!(Role::from(SignupRole::Administrator), Role::CooperativeAdmin);

        assert!("COOPERATIVE_ADMIN".parse::<SignupRole>().is_err());
        assert_eq!("administrator".parse::<SignupRole>(), Ok(SignupRole::Administrator));
        assert_eq!(
            "superuser".parse::<SignupRole>(),
            Err("\"superuser\" is not a valid choice.".to_string())
        );
    }

    #[test]
    fn role_round_trips_through_storage_name() {
        for role in [Role::Rider, Role::CooperativeAdmin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn normalizes_blank_fields() {
        let request = RegisterRequest {
            email: Some("  Rider@Example.COM ".to_string()),
            phone_number: Some("   ".to_string()),
            role: Some(" ".to_string()),
            full_name: " Ada Rider ".to_string(),
            ..Default::default()
        }
        .normalized();

        assert_eq!(request.email.as_deref(), Some("rider@example.com"));
        assert_eq!(request.phone_number, None);
        assert_eq!(request.role, None);
        assert_eq!(request.full_name, "Ada Rider");
    }
}
