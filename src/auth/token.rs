use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// HS256 signer and verifier for access/refresh tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access)?,
            refresh: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Returns the user id carried by a valid, unexpired token of `kind`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<i64> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| invalid_token())?;

        if data.claims.kind != kind {
            return Err(invalid_token());
        }

        data.claims.sub.parse().map_err(|_| invalid_token())
    }
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Token is invalid or expired".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(5), Duration::days(1))
    }

    #[test]
    fn access_token_carries_user_id() {
        let issuer = issuer();
        let pair = issuer.issue_pair(42).unwrap();
        assert_eq!(issuer.verify(&pair.access, TokenKind::Access).unwrap(), 42);
        assert_eq!(issuer.verify(&pair.refresh, TokenKind::Refresh).unwrap(), 42);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let issuer = issuer();
        let pair = issuer.issue_pair(42).unwrap();
        assert!(issuer.verify(&pair.refresh, TokenKind::Access).is_err());
        assert!(issuer.verify(&pair.access, TokenKind::Refresh).is_err());
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let other = TokenIssuer::new("other-secret", Duration::minutes(5), Duration::days(1));
        let token = other.issue(42, TokenKind::Access).unwrap();
        assert!(issuer().verify(&token, TokenKind::Access).is_err());

        let expired = TokenIssuer::new("test-secret", Duration::minutes(-5), Duration::days(1));
        let token = expired.issue(42, TokenKind::Access).unwrap();
        assert!(matches!(
            issuer().verify(&token, TokenKind::Access),
            Err(AppError::Unauthorized(_))
        ));
    }
}
