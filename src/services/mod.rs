//! Services module - HTTP route handlers
//!
//! One sub-module per API area. Handlers validate the request DTO, talk to
//! the repositories in `AppState` and map failures to `AppError`.

pub mod items;
pub mod login;
pub mod users;
pub mod utils;

pub use items::{create_item, delete_item, read_item, read_items, update_item};
pub use login::{login_access_token, recover_password, reset_password, test_token};
pub use users::{
    create_user, delete_user, delete_user_me, read_user_by_id, read_user_me, read_users,
    register_user, update_password_me, update_user, update_user_me,
};
pub use utils::{health_check, root};
