//! DTOs module - Data Transfer Objects
//!
//! DTOs keep the external API representation apart from the entities stored
//! in the database. Request DTOs carry their `validator` rules.

pub mod auth;
pub mod item;
pub mod query;
pub mod user;

pub use auth::{LoginForm, MessageDTO, NewPasswordDTO, TokenDTO};
pub use item::{CreateItemDTO, ItemDTO, ItemsDTO, NewItemDTO, UpdateItemDTO};
pub use query::PaginationQuery;
pub use user::{
    CreateUserDTO, RegisterUserDTO, UpdatePasswordDTO, UpdateUserDTO, UpdateUserMeDTO, UserDTO,
    UsersDTO,
};
