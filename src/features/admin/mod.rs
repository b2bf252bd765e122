//! Admin user management.
//!
//! Every endpoint here requires an admin account; non-admin callers get 403.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/users` | List accounts, paginated |
//! | POST | `/api/admin/users` | Create an account |
//! | PUT | `/api/admin/users/{id}` | Update an account |
//! | DELETE | `/api/admin/users/{id}` | Delete an account (never your own) |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
