//! Full-database JSON export and restore, for admins.
//!
//! The export is a self-contained snapshot, password hashes included, so a
//! restore onto a fresh database reproduces working logins. Import runs in a
//! single transaction and upserts by id: it either applies completely or not
//! at all.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/backup` | Download a snapshot document |
//! | POST | `/api/admin/backup` | Restore from a snapshot document |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::BackupService;
