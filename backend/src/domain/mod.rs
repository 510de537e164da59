//! Domain primitives, the error catalog and the driven ports.
//!
//! Purpose: define the transport-agnostic vocabulary shared by handlers and
//! adapters. Entities are plain data received from the identity backend and
//! never cached.
//!
//! Public surface:
//! - AdminResult / Outcome: success/failure envelope and its accessors.
//! - Error / CatalogEntry: failure payload and its named causes.
//! - UserErrors, GroupErrors and the other catalog families.
//! - TenantId / TenantContext: tenant scoping.
//! - User, Group, TokenDetails: backend resource shapes.

pub mod catalog;
pub mod error;
pub mod group;
pub mod ports;
pub mod result;
pub mod tenant;
pub mod token;
pub mod user;

pub use self::catalog::{
    GroupErrors, MembershipErrors, RequestErrors, TenantErrors, TokenErrors, UserErrors,
};
pub use self::error::{CatalogEntry, Error};
pub use self::group::{Group, GroupResponse, NewGroup};
pub use self::result::{AdminResult, Outcome};
pub use self::tenant::{RequestTenant, TenantContext, TenantId, TenantValidationError};
pub use self::token::{AccessToken, TokenDetails};
pub use self::user::{
    NewUser, Password, User, UserAccess, UserFilter, UserId, UserLookup, UserResponse,
    UserUpdate, UserValidationError,
};
