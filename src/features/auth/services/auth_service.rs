use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthUserDto, LoginResponseDto};
use crate::features::auth::models::{find_mock_user, UserRole};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: UserRole,
    iat: i64,
    exp: i64,
}

/// Issues and checks HS256 session tokens for the built-in demo accounts
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            token_ttl: config.token_ttl,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponseDto> {
        let user = find_mock_user(username.trim())
            .filter(|u| u.password == password)
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let now = Utc::now().timestamp();
        let expires_in = self.token_ttl.as_secs() as i64;
        let claims = Claims {
            sub: user.username.to_string(),
            role: user.role,
            iat: now,
            exp: now + expires_in,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::info!(username = user.username, "Mock login succeeded");

        Ok(LoginResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: AuthUserDto::from_mock(user, true),
        })
    }

    /// Resolve a bearer token to the account it was issued for
    pub fn verify(&self, token: &str) -> Result<AuthUserDto> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user = find_mock_user(&data.claims.sub)
            .ok_or_else(|| AppError::Unauthorized("Unknown token subject".to_string()))?;
        Ok(AuthUserDto::from_mock(user, true))
    }

    /// Identity for a bare user id. Unknown ids are treated as contributors.
    pub fn resolve_user_id(&self, user_id: &str) -> AuthUserDto {
        match find_mock_user(user_id) {
            Some(user) => AuthUserDto::from_mock(user, false),
            None => AuthUserDto {
                id: user_id.to_string(),
                username: user_id.to_string(),
                role: UserRole::Contributor,
                authenticated: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::DEFAULT_USER_ID;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            token_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let auth = service();
        let response = auth.login("reliefAdmin", "relief123").unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        let user = auth.verify(&response.access_token).unwrap();
        assert_eq!(user.id, "reliefAdmin");
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.authenticated);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let auth = service();
        assert!(matches!(
            auth.login("reliefAdmin", "wrong"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.login("nobody", "relief123"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(&AuthConfig {
            token_secret: "another-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
        });
        let token = other.login("citizen1", "citizen123").unwrap().access_token;

        assert!(service().verify(&token).is_err());
        assert!(service().verify("not-a-token").is_err());
    }

    #[test]
    fn test_resolve_user_id() {
        let auth = service();
        let known = auth.resolve_user_id(DEFAULT_USER_ID);
        assert_eq!(known.role, UserRole::Admin);
        assert!(!known.authenticated);

        let unknown = auth.resolve_user_id("volunteer42");
        assert_eq!(unknown.username, "volunteer42");
        assert_eq!(unknown.role, UserRole::Contributor);
    }
}
