//! Account registration and credential flows

use std::sync::Arc;

use tracing::info;

use crate::auth::jwt::{self, JwtConfig, TokenError};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository, UserRole};

/// Access/refresh token pair handed out at login and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_config: JwtConfig) -> Self {
        Self { users, jwt_config }
    }

    /// Register a regular account. Uniqueness of username and email is
    /// enforced by the repository.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<User> {
        let password_hash =
            hash_password(&request.password).map_err(|e| DomainError::Database(e.to_string()))?;

        let user = self
            .users
            .insert(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                full_name: request.full_name,
                phone_number: request.phone_number,
                role: UserRole::User,
            })
            .await?;
        info!(username = %user.username, "registered account");
        Ok(user)
    }

    /// Verify credentials and hand out a fresh token pair. All credential
    /// failures share one message so probes cannot tell accounts apart.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<(User, TokenPair)> {
        let invalid = || DomainError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        if !matches {
            return Err(invalid());
        }
        if !user.enabled {
            return Err(DomainError::Unauthorized("Account is disabled".to_string()));
        }

        let tokens = self.issue_pair(&user.username)?;
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a fresh pair. Access tokens are not
    /// accepted here, mirroring the gate's refusal of refresh tokens.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<(User, TokenPair)> {
        let claims = jwt::decode_claims(refresh_token, &self.jwt_config).map_err(|e| match e {
            TokenError::Expired => {
                DomainError::Unauthorized("Refresh token has expired".to_string())
            }
            _ => DomainError::Unauthorized("Invalid refresh token".to_string()),
        })?;
        if !claims.is_refresh() {
            return Err(DomainError::Unauthorized(
                "Token is not a refresh token".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Unknown account".to_string()))?;
        if !user.enabled {
            return Err(DomainError::Unauthorized("Account is disabled".to_string()));
        }

        let tokens = self.issue_pair(&user.username)?;
        Ok((user, tokens))
    }

    pub async fn get_by_username(&self, username: &str) -> DomainResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "username", username))
    }

    fn issue_pair(&self, username: &str) -> DomainResult<TokenPair> {
        let access_token = jwt::issue_access_token(username, &self.jwt_config)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let refresh_token = jwt::issue_refresh_token(username, &self.jwt_config)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryUserRepository;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "user-service-test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
        }
    }

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        (UserService::new(users.clone(), jwt_config()), users)
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct horse".to_string(),
            full_name: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let (service, _) = service();
        let user = service.register(register_request("alice")).await.unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(user.enabled);

        let (logged_in, tokens) = service.login("alice", "correct horse").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!tokens.access_token.is_empty());
        assert_ne!(tokens.access_token, tokens.refresh_token);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_alike() {
        let (service, _) = service();
        service.register(register_request("alice")).await.unwrap();

        let wrong = service.login("alice", "wrong").await.unwrap_err();
        let unknown = service.login("nobody", "whatever").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in() {
        let (service, users) = service();
        users
            .seed(
                NewUser {
                    username: "carol".to_string(),
                    email: "carol@example.com".to_string(),
                    password_hash: hash_password("pw").unwrap(),
                    full_name: None,
                    phone_number: None,
                    role: UserRole::User,
                },
                false,
            )
            .await;

        assert!(matches!(
            service.login("carol", "pw").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn refresh_accepts_only_refresh_tokens() {
        let (service, _) = service();
        service.register(register_request("alice")).await.unwrap();
        let (_, tokens) = service.login("alice", "correct horse").await.unwrap();

        let (user, new_tokens) = service.refresh(&tokens.refresh_token).await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(!new_tokens.access_token.is_empty());

        assert!(matches!(
            service.refresh(&tokens.access_token).await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (service, _) = service();
        service.register(register_request("alice")).await.unwrap();
        assert!(matches!(
            service.register(register_request("alice")).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
