mod admin_user_dto;

pub use admin_user_dto::{CreateUserDto, UpdateUserDto};
