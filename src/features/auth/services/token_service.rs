use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, SessionClaims};
use crate::features::users::models::User;

/// Issues and validates HS256 session tokens.
///
/// The admin flag and username are embedded in the claims at login time;
/// a role change takes effect on the next login (last-writer-wins, no
/// server-side session store to invalidate).
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            session_ttl: Duration::days(config.session_ttl_days),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid session token subject".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            username: data.claims.username,
            is_admin: data.claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service(secret: &str) -> TokenService {
        TokenService::new(AuthConfig {
            secret: secret.to_string(),
            session_ttl_days: 180,
        })
    }

    fn sample_user() -> User {
        User {
            id: Uuid::from_u128(42),
            username: "alice".to_string(),
            password_hash: "irrelevant".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let service = service("a-secret-long-enough");
        let user = sample_user();

        let token = service.issue(&user).unwrap();
        let authenticated = service.verify(&token).unwrap();

        assert_eq!(authenticated.id, user.id);
        assert_eq!(authenticated.username, "alice");
        assert!(authenticated.is_admin);
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let token = service("a-secret-long-enough")
            .issue(&sample_user())
            .unwrap();

        let err = service("another-secret-entirely")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = service("a-secret-long-enough");
        assert!(matches!(
            service.verify("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
