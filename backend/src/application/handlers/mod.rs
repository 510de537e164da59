//! Handlers, one per intent.

mod group_users;
mod groups;
mod users;

pub use group_users::{AddUserToGroupHandler, GetGroupMembersHandler, RemoveUserFromGroupHandler};
pub use groups::{CreateGroupHandler, DeleteGroupHandler, GetAllGroupsHandler, GetGroupHandler};
pub use users::{
    CreateUserHandler, DeleteUserHandler, GetUserHandler, GetUsersHandler, ResetPasswordHandler,
    UpdateUserHandler,
};
