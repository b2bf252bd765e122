//! User lookups for the sharing pickers.
//!
//! Account management itself is an admin concern (see `features::admin`);
//! this feature only exposes the non-privileged lookups every user needs to
//! share a category or assign a task.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/users/sharing` | Yes | All other users, for the share picker |
//! | GET | `/api/users/search?q=` | Yes | Username substring search (min 2 chars) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
