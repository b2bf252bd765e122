use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::users::models::UserRef;

/// Reserved identifier of the virtual "shared with me" grouping.
/// It has no backing row; the API resolves it to a computed task set.
pub const SHARED_WITH_ME_ID: &str = "shared-virtual";

/// Display name of the virtual grouping
pub const SHARED_WITH_ME_NAME: &str = "Shared with me";

/// Display color of the virtual grouping (Indigo)
pub const SHARED_WITH_ME_COLOR: &str = "#6366f1";

/// Database model for a category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category identifier as it appears in the API: either a stored row
/// or the reserved virtual grouping.
///
/// Modeling the virtual grouping as its own variant keeps sentinel-id
/// comparisons out of the resolver and makes it impossible to aim a
/// mutation at it by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRef {
    Stored(Uuid),
    SharedWithMe,
}

impl FromStr for CategoryRef {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SHARED_WITH_ME_ID {
            Ok(CategoryRef::SharedWithMe)
        } else {
            Uuid::parse_str(s).map(CategoryRef::Stored)
        }
    }
}

/// A stored category together with its sharing projections
#[derive(Debug, Clone)]
pub struct CategoryWithSharing {
    pub category: Category,
    pub owner: UserRef,
    pub collaborators: Vec<UserRef>,
    pub pending_tasks: i64,
}

/// What a user sees in their category overview: stored rows they can access
/// plus, when non-empty, the read-only virtual grouping.
#[derive(Debug, Clone)]
pub enum CategoryView {
    Stored(CategoryWithSharing),
    SharedWithMe { pending_tasks: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ref_parses_virtual_id() {
        assert_eq!(
            SHARED_WITH_ME_ID.parse::<CategoryRef>().unwrap(),
            CategoryRef::SharedWithMe
        );
    }

    #[test]
    fn test_category_ref_parses_uuid() {
        let id = Uuid::from_u128(7);
        assert_eq!(
            id.to_string().parse::<CategoryRef>().unwrap(),
            CategoryRef::Stored(id)
        );
    }

    #[test]
    fn test_category_ref_rejects_garbage() {
        assert!("not-a-category".parse::<CategoryRef>().is_err());
    }
}
