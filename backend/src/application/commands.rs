//! Commands: intents that change state on the identity backend.

use uuid::Uuid;

use super::request::impl_request;
use crate::domain::{NewGroup, NewUser, Password, TenantId, UserId, UserUpdate};

/// Provision a user: create it, confirm its identifier, then set its password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// User payload including the initial password.
    pub user: NewUser,
}

/// Apply a partial update to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// User to update.
    pub user_id: UserId,
    /// Fields to change.
    pub update: UserUpdate,
}

/// Delete a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// User to delete.
    pub user_id: UserId,
}

/// Replace a user's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// User whose password changes.
    pub user_id: UserId,
    /// New password.
    pub password: Password,
}

/// Create a top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// Group payload.
    pub group: NewGroup,
}

/// Delete a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteGroupCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// Group to delete.
    pub id: Uuid,
}

/// Add a user to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUserToGroupCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// Member to add.
    pub user_id: UserId,
    /// Group receiving the member.
    pub group_id: Uuid,
}

/// Remove a user from a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveUserFromGroupCommand {
    /// Target tenant.
    pub tenant: TenantId,
    /// Member to remove.
    pub user_id: UserId,
    /// Group losing the member.
    pub group_id: Uuid,
}

impl_request! {
    CreateUserCommand => bool, "create_user";
    UpdateUserCommand => bool, "update_user";
    DeleteUserCommand => bool, "delete_user";
    ResetPasswordCommand => crate::domain::UserResponse, "reset_password";
    CreateGroupCommand => bool, "create_group";
    DeleteGroupCommand => bool, "delete_group";
    AddUserToGroupCommand => bool, "add_user_to_group";
    RemoveUserFromGroupCommand => bool, "remove_user_from_group";
}
