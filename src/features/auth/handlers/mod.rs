pub mod auth_handler;

pub use auth_handler::{
    __path_bootstrap, __path_bootstrap_status, __path_get_me, __path_login, bootstrap,
    bootstrap_status, get_me, login,
};
