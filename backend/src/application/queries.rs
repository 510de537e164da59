//! Queries: read-only intents.

use uuid::Uuid;

use super::request::impl_request;
use crate::domain::{GroupResponse, TenantId, UserFilter, UserLookup, UserResponse};

/// Fetch one user by username or identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserQuery {
    /// Target tenant.
    pub tenant: TenantId,
    /// Username or identifier of the user.
    pub lookup: UserLookup,
}

/// List users within a paging window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUsersQuery {
    /// Target tenant.
    pub tenant: TenantId,
    /// Paging and search window.
    pub filter: UserFilter,
}

/// List every group of the tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAllGroupsQuery {
    /// Target tenant.
    pub tenant: TenantId,
}

/// Fetch one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetGroupQuery {
    /// Target tenant.
    pub tenant: TenantId,
    /// Group to fetch.
    pub id: Uuid,
}

/// List the direct members of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetGroupMembersQuery {
    /// Target tenant.
    pub tenant: TenantId,
    /// Group whose members are listed.
    pub group_id: Uuid,
}

impl_request! {
    GetUserQuery => UserResponse, "get_user";
    GetUsersQuery => Vec<UserResponse>, "get_users";
    GetAllGroupsQuery => Vec<GroupResponse>, "get_all_groups";
    GetGroupQuery => GroupResponse, "get_group";
    GetGroupMembersQuery => Vec<UserResponse>, "get_group_members";
}
