use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Cooperative {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links one rider to one cooperative.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CooperativeMembership {
    pub id: i64,
    pub user_id: i64,
    pub cooperative_id: i64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberSummary {
    pub user_id: i64,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminSummary {
    pub user_id: i64,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// A cooperative together with its member roster and admin set.
#[derive(Debug, Clone)]
pub struct CooperativeDetail {
    pub cooperative: Cooperative,
    pub members: Vec<MemberSummary>,
    pub admins: Vec<AdminSummary>,
}

/// Public `{id, name}` entry for the signup form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
pub struct CooperativeChoice {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCooperativeRequest {
    #[serde(default)]
    pub name: String,
}
