//! Pure access rules for categories and tasks.
//!
//! Everything here is database-free so the rules can be unit tested and
//! reused by the SQL predicates that mirror them.

use uuid::Uuid;

use crate::features::categories::models::CategoryWithSharing;
use crate::features::users::models::UserRef;

/// A category is visible to its owner and to every collaborator. There is
/// no read-only tier: visibility implies read/write on the tasks inside.
pub fn category_visible(user_id: Uuid, owner_id: Uuid, collaborator_ids: &[Uuid]) -> bool {
    owner_id == user_id || collaborator_ids.contains(&user_id)
}

/// A task is visible when its category is, or when the user created it or
/// is assigned to it. The creator/assignee arms keep a task reachable even
/// after the user loses access to the surrounding category.
pub fn task_visible(
    category_visible: bool,
    user_id: Uuid,
    creator_id: Uuid,
    assignee_id: Option<Uuid>,
) -> bool {
    category_visible || creator_id == user_id || assignee_id == Some(user_id)
}

/// Outcome of an owner-only mutation attempt on a stored category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAccess {
    /// The viewer owns the category
    Allowed,
    /// The viewer is a collaborator: the category is real but not theirs
    /// to change
    Denied,
    /// The viewer is not a member; the category must read as absent
    Hidden,
}

/// Rename, recolor, re-share and delete are owner-only. Collaborators get
/// an explicit refusal; everyone else must not learn the category exists.
pub fn mutation_access(user_id: Uuid, owner_id: Uuid, is_collaborator: bool) -> MutationAccess {
    if owner_id == user_id {
        MutationAccess::Allowed
    } else if is_collaborator {
        MutationAccess::Denied
    } else {
        MutationAccess::Hidden
    }
}

/// How a visible category relates to the viewer, for display purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharingRole<'a> {
    /// Owned by the viewer, not shared with anyone
    Owned,
    /// Owned by the viewer and shared with the listed collaborators
    OwnedShared { collaborators: &'a [UserRef] },
    /// Shared with the viewer by the listed owner
    SharedByOther { owner: &'a UserRef },
}

/// Classify a visible category for the viewer.
///
/// Callers must only pass categories the viewer can actually see; a
/// non-member viewer is reported as `SharedByOther` rather than rejected.
pub fn classify(user_id: Uuid, category: &CategoryWithSharing) -> SharingRole<'_> {
    if category.category.owner_id != user_id {
        return SharingRole::SharedByOther {
            owner: &category.owner,
        };
    }
    if category.collaborators.is_empty() {
        SharingRole::Owned
    } else {
        SharingRole::OwnedShared {
            collaborators: &category.collaborators,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::features::categories::models::Category;

    fn user(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn sharing(owner_id: Uuid, collaborators: Vec<UserRef>) -> CategoryWithSharing {
        let now = Utc::now();
        CategoryWithSharing {
            category: Category {
                id: Uuid::from_u128(100),
                name: "Groceries".to_string(),
                color: "#ff0000".to_string(),
                owner_id,
                created_at: now,
                updated_at: now,
            },
            owner: UserRef {
                id: owner_id,
                username: "owner".to_string(),
            },
            collaborators,
            pending_tasks: 0,
        }
    }

    #[test]
    fn test_owner_sees_category() {
        let owner = user(1);
        assert!(category_visible(owner, owner, &[]));
    }

    #[test]
    fn test_collaborator_sees_category() {
        let owner = user(1);
        let member = user(2);
        assert!(category_visible(member, owner, &[member]));
    }

    #[test]
    fn test_outsider_does_not_see_category() {
        assert!(!category_visible(user(3), user(1), &[user(2)]));
    }

    #[test]
    fn test_task_visible_through_category() {
        assert!(task_visible(true, user(3), user(1), None));
    }

    #[test]
    fn test_creator_keeps_task_after_losing_category_access() {
        let creator = user(2);
        assert!(task_visible(false, creator, creator, None));
    }

    #[test]
    fn test_assignee_sees_task_outside_category() {
        let assignee = user(4);
        assert!(task_visible(false, assignee, user(1), Some(assignee)));
    }

    #[test]
    fn test_unrelated_user_does_not_see_task() {
        assert!(!task_visible(false, user(5), user(1), Some(user(4))));
    }

    #[test]
    fn test_owner_may_mutate() {
        let owner = user(1);
        assert_eq!(mutation_access(owner, owner, false), MutationAccess::Allowed);
    }

    #[test]
    fn test_collaborator_mutation_is_refused_not_hidden() {
        assert_eq!(mutation_access(user(2), user(1), true), MutationAccess::Denied);
    }

    #[test]
    fn test_outsider_mutation_reads_as_absent() {
        assert_eq!(mutation_access(user(3), user(1), false), MutationAccess::Hidden);
    }

    #[test]
    fn test_classify_owned() {
        let owner = user(1);
        let cat = sharing(owner, vec![]);
        assert_eq!(classify(owner, &cat), SharingRole::Owned);
    }

    #[test]
    fn test_classify_owned_shared() {
        let owner = user(1);
        let member = UserRef {
            id: user(2),
            username: "alice".to_string(),
        };
        let cat = sharing(owner, vec![member]);
        assert!(matches!(
            classify(owner, &cat),
            SharingRole::OwnedShared { collaborators } if collaborators.len() == 1
        ));
    }

    #[test]
    fn test_classify_shared_by_other() {
        let owner = user(1);
        let member = UserRef {
            id: user(2),
            username: "alice".to_string(),
        };
        let cat = sharing(owner, vec![member.clone()]);
        assert!(matches!(
            classify(member.id, &cat),
            SharingRole::SharedByOther { owner } if owner.username == "owner"
        ));
    }
}
