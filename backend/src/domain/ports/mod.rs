//! Domain ports for the hexagonal boundary.
//!
//! One capability set per resource kind. The sets do not share a base trait
//! because their operations do not overlap. Every operation is tenant-scoped,
//! receives the caller's cancellation token, and reports failures as catalog
//! errors.

mod group_repository;
mod group_users_repository;
mod token_repository;
mod user_repository;

#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::GroupRepository;
#[cfg(test)]
pub use group_users_repository::MockGroupUsersRepository;
pub use group_users_repository::GroupUsersRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::TokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCreation, UserRepository};
