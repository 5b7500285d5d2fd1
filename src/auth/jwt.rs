//! JWT token issuance and validation
//!
//! Tokens are self-contained and stateless: no server-side session store,
//! just an HS512 signature over `{sub, type, iat, exp}` with a shared secret.
//! Access and refresh tokens differ only in `type` and validity; a refresh
//! token must never be accepted as proof of identity for ordinary requests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token validity in minutes
    pub access_token_minutes: i64,
    /// Refresh token validity in days
    pub refresh_token_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production-this-is-not-a-secret".to_string()),
            access_token_minutes: 60,
            refresh_token_days: 7,
        }
    }
}

impl JwtConfig {
    pub fn access_validity(&self) -> Duration {
        Duration::minutes(self.access_token_minutes)
    }

    pub fn refresh_validity(&self) -> Duration {
        Duration::days(self.refresh_token_days)
    }
}

/// Token discriminator carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claim set of a signed token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Token type
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Validation failures, with expiry distinct from signature/format problems
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token subject mismatch")]
    SubjectMismatch,
    #[error("invalid token")]
    Invalid,
}

/// Sign a token of the given type for `subject`.
pub fn issue_token(
    subject: &str,
    token_type: TokenType,
    validity: Duration,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: subject.to_string(),
        token_type,
        iat: now.timestamp(),
        exp: (now + validity).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn issue_access_token(
    subject: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(subject, TokenType::Access, config.access_validity(), config)
}

pub fn issue_refresh_token(
    subject: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(subject, TokenType::Refresh, config.refresh_validity(), config)
}

/// Verify signature and expiry, returning the claim set.
pub fn decode_claims(token: &str, config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.leeway = 0;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

/// Full validation: signature, expiry, and exact subject equality.
pub fn validate_for_subject(
    token: &str,
    expected_subject: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, TokenError> {
    let claims = decode_claims(token, config)?;
    if claims.sub != expected_subject {
        return Err(TokenError::SubjectMismatch);
    }
    Ok(claims)
}

/// Subject claim of a valid token.
pub fn extract_subject(token: &str, config: &JwtConfig) -> Result<String, TokenError> {
    decode_claims(token, config).map(|c| c.sub)
}

/// Whether the token is refresh-typed. Malformed tokens report an error,
/// which callers treat the same as "not usable here".
pub fn is_refresh_token(token: &str, config: &JwtConfig) -> Result<bool, TokenError> {
    decode_claims(token, config).map(|c| c.is_refresh())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
        }
    }

    #[test]
    fn issue_and_validate_access_token() {
        let config = test_config();
        let token = issue_access_token("alice", &config).unwrap();

        let claims = validate_for_subject(&token, "alice", &config).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_refresh());
    }

    #[test]
    fn access_token_is_not_refresh() {
        let config = test_config();
        let token = issue_access_token("alice", &config).unwrap();
        assert_eq!(is_refresh_token(&token, &config), Ok(false));
        assert_eq!(extract_subject(&token, &config), Ok("alice".to_string()));

        let refresh = issue_refresh_token("alice", &config).unwrap();
        assert_eq!(is_refresh_token(&refresh, &config), Ok(true));
    }

    #[test]
    fn subject_mismatch_is_rejected() {
        let config = test_config();
        let token = issue_access_token("alice", &config).unwrap();
        assert_eq!(
            validate_for_subject(&token, "bob", &config),
            Err(TokenError::SubjectMismatch)
        );
    }

    #[test]
    fn expired_token_fails_with_expiry_even_for_correct_subject() {
        let config = test_config();
        let token =
            issue_token("alice", TokenType::Access, Duration::seconds(-30), &config).unwrap();
        assert_eq!(
            validate_for_subject(&token, "alice", &config),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_token_fails_as_invalid() {
        let config = test_config();
        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            ..test_config()
        };
        let token = issue_access_token("alice", &other).unwrap();
        assert_eq!(decode_claims(&token, &config), Err(TokenError::Invalid));
        assert_eq!(decode_claims("not-a-token", &config), Err(TokenError::Invalid));
    }
}
