pub mod user_handler;

pub use user_handler::{__path_list_for_sharing, __path_search_users, list_for_sharing, search_users};
