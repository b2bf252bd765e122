mod admin_user_handler;

pub use admin_user_handler::{
    create_user, delete_user, list_users, update_user, __path_create_user, __path_delete_user,
    __path_list_users, __path_update_user,
};
