use std::collections::BTreeSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::{Category, CategoryRef, CategoryView, CategoryWithSharing};
use crate::features::categories::visibility;
use crate::features::users::models::UserRef;
use crate::shared::constants::DEFAULT_CATEGORY_COLOR;

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every category the user can see, plus the virtual shared view
    /// when at least one visible pending task was created by someone else.
    /// The virtual entry sorts first; stored rows follow in creation order.
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<CategoryView>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.color, c.owner_id, c.created_at, c.updated_at
            FROM categories c
            WHERE c.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM category_collaborators cc
                   WHERE cc.category_id = c.id AND cc.user_id = $1
               )
            ORDER BY c.created_at
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        let mut views = Vec::with_capacity(categories.len() + 1);

        let shared_pending = self.count_shared_pending(user.id).await?;
        if shared_pending > 0 {
            views.push(CategoryView::SharedWithMe {
                pending_tasks: shared_pending,
            });
        }

        for category in categories {
            views.push(CategoryView::Stored(self.attach_sharing(category).await?));
        }

        Ok(views)
    }

    /// Create a category owned by the caller
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateCategoryDto,
    ) -> Result<CategoryWithSharing> {
        let color = dto.color.unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, color, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, color, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.name.trim())
        .bind(&color)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(CategoryWithSharing {
            category,
            owner: UserRef {
                id: user.id,
                username: user.username.clone(),
            },
            collaborators: Vec::new(),
            pending_tasks: 0,
        })
    }

    /// Update name, color and the collaborator set. Owner only; collaborators
    /// get 403 so they learn the category exists but is not theirs to change.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        reference: CategoryRef,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryWithSharing> {
        let id = self.require_owned(user, reference).await?;

        // Full replacement of the collaborator set; the owner is never a member
        let collaborators: BTreeSet<Uuid> = dto
            .collaborator_ids
            .into_iter()
            .filter(|c| *c != user.id)
            .collect();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, color = COALESCE($3, color), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.name.trim())
        .bind(dto.color.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("DELETE FROM category_collaborators WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for collaborator_id in &collaborators {
            sqlx::query(
                "INSERT INTO category_collaborators (category_id, user_id) VALUES ($1, $2)",
            )
            .bind(id)
            .bind(collaborator_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Validation("Unknown user in collaborator list".to_string())
                } else {
                    tracing::error!("Failed to set collaborators: {:?}", e);
                    AppError::Database(e)
                }
            })?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        let category = self
            .find_with_sharing(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        Ok(category)
    }

    /// Delete a category and every task inside it. Owner only.
    pub async fn delete(&self, user: &AuthenticatedUser, reference: CategoryRef) -> Result<()> {
        let id = self.require_owned(user, reference).await?;

        // Tasks, subtasks and collaborator rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    /// Load a stored category with its sharing projections
    pub async fn find_with_sharing(&self, id: Uuid) -> Result<Option<CategoryWithSharing>> {
        let Some(category) = sqlx::query_as::<_, Category>(
            "SELECT id, name, color, owner_id, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category: {:?}", e);
            AppError::Database(e)
        })?
        else {
            return Ok(None);
        };

        Ok(Some(self.attach_sharing(category).await?))
    }

    /// Resolve a mutable reference to an owned category id
    async fn require_owned(
        &self,
        user: &AuthenticatedUser,
        reference: CategoryRef,
    ) -> Result<Uuid> {
        let id = match reference {
            CategoryRef::Stored(id) => id,
            CategoryRef::SharedWithMe => {
                return Err(AppError::Forbidden(
                    "The shared view cannot be modified".to_string(),
                ))
            }
        };

        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, color, owner_id, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let is_collaborator = if category.owner_id == user.id {
            false
        } else {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM category_collaborators WHERE category_id = $1 AND user_id = $2)",
            )
            .bind(id)
            .bind(user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?
        };

        match visibility::mutation_access(user.id, category.owner_id, is_collaborator) {
            visibility::MutationAccess::Allowed => Ok(id),
            visibility::MutationAccess::Denied => Err(AppError::Forbidden(
                "Only the owner can modify a category".to_string(),
            )),
            // Invisible categories look like they do not exist
            visibility::MutationAccess::Hidden => {
                Err(AppError::NotFound("Category not found".to_string()))
            }
        }
    }

    async fn attach_sharing(&self, category: Category) -> Result<CategoryWithSharing> {
        let owner = sqlx::query_as::<_, UserRef>("SELECT id, username FROM users WHERE id = $1")
            .bind(category.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let collaborators = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT u.id, u.username
            FROM category_collaborators cc
            JOIN users u ON u.id = cc.user_id
            WHERE cc.category_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(category.id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let pending_tasks = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE category_id = $1 AND completed = FALSE",
        )
        .bind(category.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(CategoryWithSharing {
            category,
            owner,
            collaborators,
            pending_tasks,
        })
    }

    /// Pending tasks visible to the user but created by someone else
    async fn count_shared_pending(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tasks t
            WHERE t.completed = FALSE
              AND t.creator_id <> $1
              AND (
                  t.assignee_id = $1
                  OR EXISTS (
                      SELECT 1 FROM categories c
                      WHERE c.id = t.category_id
                        AND (c.owner_id = $1 OR EXISTS (
                            SELECT 1 FROM category_collaborators cc
                            WHERE cc.category_id = c.id AND cc.user_id = $1
                        ))
                  )
              )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count shared tasks: {:?}", e);
            AppError::Database(e)
        })
    }
}
