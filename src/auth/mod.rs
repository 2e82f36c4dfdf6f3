use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::Duration;

use crate::{
    config::AuthConfig,
    domain::User,
    error::{AppError, Result},
    repository::UserRepository,
};

pub mod token;

pub use token::{TokenIssuer, TokenKind, TokenPair};

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            tokens: TokenIssuer::new(
                &config.jwt_secret,
                Duration::minutes(config.access_token_minutes),
                Duration::days(config.refresh_token_days),
            ),
        }
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password check panicked: {}", e)))?
    }

    /// Hash a password using Argon2.
    pub async fn hash_password(password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing panicked: {}", e)))?
    }

    /// Exchanges an email (any case) or phone number plus password for a token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let username = username.trim();
        let user = if username.contains('@') {
            self.users.find_by_email(username).await?
        } else {
            self.users.find_by_phone(username).await?
        };
        let user = user
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        let hash = self
            .users
            .password_hash(user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        let verified = match Self::verify_password(password, &hash).await {
            Ok(verified) => verified,
            Err(e) => {
                // An unusable stored hash locks the account out rather than failing the request.
                tracing::warn!("Password check failed for user {}: {}", user.id, e);
                false
            }
        };
        if !verified {
            tracing::debug!("Failed login for user {}", user.id);
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        self.tokens.issue_pair(user.id)
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        let user_id = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        self.tokens.issue(user_id, TokenKind::Access)
    }

    /// Resolves a bearer access token to an active account.
    pub async fn authenticate(&self, access_token: &str) -> Result<User> {
        let user_id = self.tokens.verify(access_token, TokenKind::Access)?;
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}
