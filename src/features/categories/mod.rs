//! Task categories with owner/collaborator sharing.
//!
//! A category is owned by exactly one user; other users can be granted
//! non-owning collaborator access (read/write on tasks, no rename/recolor,
//! no re-sharing, no delete). The synthetic "Shared with me" grouping is a
//! computed read-only view over visible tasks created by someone else; it has
//! no backing row and rejects every mutation.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories` | Yes | Visible categories + virtual shared view |
//! | POST | `/api/categories` | Yes | Create a category (caller becomes owner) |
//! | PUT | `/api/categories/{id}` | Yes | Update name/color/collaborators (owner only) |
//! | DELETE | `/api/categories/{id}` | Yes | Delete with tasks (owner only) |
//!
//! Category contents (`GET /api/categories/{id}/tasks`) are served by the
//! tasks feature, which owns task ordering and recurrence classification.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod visibility;

pub use services::CategoryService;
