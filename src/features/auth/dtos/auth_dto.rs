use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for creating the first (admin) user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRequestDto {
    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username may only contain letters, digits and underscores"
        )
    )]
    pub username: String,

    /// Bcrypt truncates input beyond 72 bytes, hence the upper bound
    #[validate(length(min = 4, max = 72, message = "Password must be 4-72 characters"))]
    pub password: String,
}

/// Request DTO for login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for successful login or bootstrap
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Bearer session token
    pub token: String,
    pub user: UserResponseDto,
}

/// Response DTO for the bootstrap status probe
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapStatusDto {
    /// True once any user exists
    pub initialized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_dto_rejects_bad_username() {
        let dto = BootstrapRequestDto {
            username: "bad name".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bootstrap_dto_rejects_overlong_password() {
        let dto = BootstrapRequestDto {
            username: "alice".to_string(),
            password: "x".repeat(73),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bootstrap_dto_accepts_valid_input() {
        let dto = BootstrapRequestDto {
            username: "alice_01".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
