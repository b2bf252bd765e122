use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{
    CategoryView, CategoryWithSharing, SHARED_WITH_ME_COLOR, SHARED_WITH_ME_ID,
    SHARED_WITH_ME_NAME,
};
use crate::features::categories::visibility::{self, SharingRole};
use crate::features::users::dtos::UserRefDto;
use crate::shared::validation::HEX_COLOR_REGEX;

/// DTO for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    /// Hex color like `#6366f1`; defaults when omitted
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a hex value like #6366f1"))]
    pub color: Option<String>,
}

/// DTO for updating a category. The collaborator list is a full replacement:
/// the stored set becomes exactly what is sent, minus the owner.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a hex value like #6366f1"))]
    pub color: Option<String>,

    #[serde(default)]
    pub collaborator_ids: Vec<Uuid>,
}

/// How a category relates to the viewer
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum SharingRoleDto {
    Owned,
    #[serde(rename_all = "camelCase")]
    OwnedShared { collaborators: Vec<UserRefDto> },
    #[serde(rename_all = "camelCase")]
    SharedByOther { owner: UserRefDto },
}

impl From<SharingRole<'_>> for SharingRoleDto {
    fn from(role: SharingRole<'_>) -> Self {
        match role {
            SharingRole::Owned => SharingRoleDto::Owned,
            SharingRole::OwnedShared { collaborators } => SharingRoleDto::OwnedShared {
                collaborators: collaborators.iter().cloned().map(UserRefDto::from).collect(),
            },
            SharingRole::SharedByOther { owner } => SharingRoleDto::SharedByOther {
                owner: UserRefDto::from(owner.clone()),
            },
        }
    }
}

/// Response DTO for a stored category
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub owner: UserRefDto,
    pub collaborators: Vec<UserRefDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryWithSharing> for CategoryResponseDto {
    fn from(cat: CategoryWithSharing) -> Self {
        Self {
            id: cat.category.id,
            name: cat.category.name,
            color: cat.category.color,
            owner: UserRefDto::from(cat.owner),
            collaborators: cat.collaborators.into_iter().map(UserRefDto::from).collect(),
            created_at: cat.category.created_at,
            updated_at: cat.category.updated_at,
        }
    }
}

/// One entry in the category overview.
///
/// The virtual grouping uses a reserved string id instead of a UUID, so the
/// two shapes are kept as distinct variants rather than widening every field.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategoryViewDto {
    #[serde(rename_all = "camelCase")]
    Stored {
        id: Uuid,
        name: String,
        color: String,
        owner: UserRefDto,
        collaborators: Vec<UserRefDto>,
        sharing: SharingRoleDto,
        pending_tasks: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    SharedWithMe {
        id: String,
        name: String,
        color: String,
        pending_tasks: i64,
    },
}

impl CategoryViewDto {
    pub fn from_view(viewer_id: Uuid, view: CategoryView) -> Self {
        match view {
            CategoryView::Stored(cat) => {
                let sharing = SharingRoleDto::from(visibility::classify(viewer_id, &cat));
                CategoryViewDto::Stored {
                    id: cat.category.id,
                    name: cat.category.name,
                    color: cat.category.color,
                    owner: UserRefDto::from(cat.owner),
                    collaborators: cat
                        .collaborators
                        .into_iter()
                        .map(UserRefDto::from)
                        .collect(),
                    sharing,
                    pending_tasks: cat.pending_tasks,
                    created_at: cat.category.created_at,
                    updated_at: cat.category.updated_at,
                }
            }
            CategoryView::SharedWithMe { pending_tasks } => CategoryViewDto::SharedWithMe {
                id: SHARED_WITH_ME_ID.to_string(),
                name: SHARED_WITH_ME_NAME.to_string(),
                color: SHARED_WITH_ME_COLOR.to_string(),
                pending_tasks,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_rejects_bad_color() {
        let dto = CreateCategoryDto {
            name: "Chores".to_string(),
            color: Some("red".to_string()),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_accepts_hex_color() {
        let dto = CreateCategoryDto {
            name: "Chores".to_string(),
            color: Some("#A1b2C3".to_string()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_dto_rejects_empty_name() {
        let dto = UpdateCategoryDto {
            name: String::new(),
            color: None,
            collaborator_ids: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_virtual_view_serializes_reserved_id() {
        let dto = CategoryViewDto::from_view(
            Uuid::from_u128(1),
            CategoryView::SharedWithMe { pending_tasks: 3 },
        );
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["kind"], "sharedWithMe");
        assert_eq!(json["id"], SHARED_WITH_ME_ID);
        assert_eq!(json["pendingTasks"], 3);
    }
}
