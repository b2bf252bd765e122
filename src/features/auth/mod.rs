//! Session authentication feature.
//!
//! Username/password login against locally stored bcrypt hashes; successful
//! logins are issued an HS256 session token carried as a Bearer token. The
//! bootstrap endpoints cover the first-run flow where no user exists yet and
//! the initial admin account must be created.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/auth/bootstrap` | No | Whether any user exists yet |
//! | POST | `/api/auth/bootstrap` | No | Create the first (admin) user |
//! | POST | `/api/auth/login` | No | Log in, returns session token |
//! | GET | `/api/auth/me` | Yes | Current authenticated user |

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, TokenService};
