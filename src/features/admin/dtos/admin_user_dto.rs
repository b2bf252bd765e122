use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::USERNAME_REGEX;

/// DTO for creating a user account
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must start with a letter or underscore and contain only letters, digits and underscores"
        )
    )]
    pub username: String,

    #[validate(length(min = 4, max = 72, message = "Password must be 4-72 characters"))]
    pub password: String,

    #[serde(default)]
    pub is_admin: bool,
}

/// DTO for updating a user account. An empty or omitted password keeps the
/// current one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must start with a letter or underscore and contain only letters, digits and underscores"
        )
    )]
    pub username: String,

    pub password: Option<String>,

    #[serde(default)]
    pub is_admin: bool,
}

impl UpdateUserDto {
    /// The new password, if one was actually supplied
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_rejects_bad_username() {
        let dto = CreateUserDto {
            username: "9lives".to_string(),
            password: "secret".to_string(),
            is_admin: false,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_rejects_short_password() {
        let dto = CreateUserDto {
            username: "alice".to_string(),
            password: "abc".to_string(),
            is_admin: false,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_password_means_keep_current() {
        let dto = UpdateUserDto {
            username: "alice".to_string(),
            password: Some("   ".to_string()),
            is_admin: false,
        };
        assert_eq!(dto.new_password(), None);

        let dto = UpdateUserDto {
            username: "alice".to_string(),
            password: Some("hunter2".to_string()),
            is_admin: false,
        };
        assert_eq!(dto.new_password(), Some("hunter2"));
    }
}
