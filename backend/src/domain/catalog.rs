//! Named failure causes, one family per resource kind.

use super::error::CatalogEntry;

/// Failures raised by user operations.
#[derive(Debug, Clone, Copy)]
pub struct UserErrors;

impl UserErrors {
    /// The backend refused to create the user.
    pub const CREATION: CatalogEntry =
        CatalogEntry::new("User.CreationError", "The user could not be created");
    /// The supplied password does not satisfy the tenant's password policy.
    pub const WRONG_PASSWORD_DEFINITION: CatalogEntry = CatalogEntry::new(
        "User.WrongPasswordDefinition",
        "The password does not satisfy the tenant password policy",
    );
    /// No user matches the supplied username or identifier.
    pub const NOT_FOUND: CatalogEntry = CatalogEntry::new("User.NotFound", "User not found");
    /// Users could not be read from the backend.
    pub const RETRIEVAL: CatalogEntry =
        CatalogEntry::new("User.RetrievalError", "Users could not be retrieved");
    /// The password reset request failed.
    pub const PASSWORD_RESET: CatalogEntry = CatalogEntry::new(
        "User.PasswordResetError",
        "The user password could not be reset",
    );
    /// The user could not be updated.
    pub const UPDATE: CatalogEntry =
        CatalogEntry::new("User.UpdateError", "The user could not be updated");
    /// The user could not be deleted.
    pub const DELETION: CatalogEntry =
        CatalogEntry::new("User.DeletionError", "The user could not be deleted");
    /// A freshly created user came back without a server-assigned identifier.
    pub const MISSING_IDENTIFIER: CatalogEntry = CatalogEntry::new(
        "User.MissingIdentifier",
        "The created user has no identifier",
    );
}

/// Failures raised while acquiring backend access tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenErrors;

impl TokenErrors {
    /// The token endpoint did not issue an access token.
    pub const GENERATION: CatalogEntry = CatalogEntry::new(
        "Token.GenerationError",
        "An access token could not be generated for the tenant",
    );
}

/// Failures raised by group operations.
#[derive(Debug, Clone, Copy)]
pub struct GroupErrors;

impl GroupErrors {
    /// The group could not be created.
    pub const CREATION: CatalogEntry =
        CatalogEntry::new("Group.CreationError", "The group could not be created");
    /// No group matches the supplied identifier.
    pub const NOT_FOUND: CatalogEntry = CatalogEntry::new("Group.NotFound", "Group not found");
    /// Groups could not be read from the backend.
    pub const RETRIEVAL: CatalogEntry =
        CatalogEntry::new("Group.RetrievalError", "Groups could not be retrieved");
    /// The group could not be deleted.
    pub const DELETION: CatalogEntry =
        CatalogEntry::new("Group.DeletionError", "The group could not be deleted");
}

/// Failures raised by group-membership operations.
#[derive(Debug, Clone, Copy)]
pub struct MembershipErrors;

impl MembershipErrors {
    /// The user could not be added to the group.
    pub const ADD: CatalogEntry = CatalogEntry::new(
        "GroupUser.AddError",
        "The user could not be added to the group",
    );
    /// The user could not be removed from the group.
    pub const REMOVE: CatalogEntry = CatalogEntry::new(
        "GroupUser.RemoveError",
        "The user could not be removed from the group",
    );
    /// Group members could not be read from the backend.
    pub const RETRIEVAL: CatalogEntry = CatalogEntry::new(
        "GroupUser.RetrievalError",
        "Group members could not be retrieved",
    );
}

/// Failures raised by the request-scoped tenant context.
#[derive(Debug, Clone, Copy)]
pub struct TenantErrors;

impl TenantErrors {
    /// No tenant was set for the current request scope.
    pub const NOT_SET: CatalogEntry =
        CatalogEntry::new("Tenant.NotSet", "No tenant is set for this request");
    /// A tenant was already set for the current request scope.
    pub const ALREADY_SET: CatalogEntry = CatalogEntry::new(
        "Tenant.AlreadySet",
        "A tenant is already set for this request",
    );
    /// The tenant identifier failed validation.
    pub const INVALID: CatalogEntry =
        CatalogEntry::new("Tenant.Invalid", "The tenant identifier is invalid");
}

/// Failures that are not tied to one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct RequestErrors;

impl RequestErrors {
    /// The caller cancelled the request before it completed.
    pub const CANCELLED: CatalogEntry =
        CatalogEntry::new("Request.Cancelled", "The request was cancelled");
    /// The request carried malformed input.
    pub const INVALID: CatalogEntry =
        CatalogEntry::new("Request.Invalid", "The request is invalid");
    /// A payload could not be serialised for the caller.
    pub const SERIALIZATION: CatalogEntry = CatalogEntry::new(
        "Request.SerializationError",
        "The response could not be serialised",
    );
}
