//! Keycloak admin REST adapters.
//!
//! One repository per driven port, all sharing a [`KeycloakClient`]. Every
//! request races the caller's cancellation token and is attempted once.

mod client;
mod dto;
mod error;
mod group_users;
mod groups;
mod token;
mod users;

pub use client::{KeycloakClient, KeycloakCredentials};
pub use error::KeycloakError;
pub use group_users::KeycloakGroupUsersRepository;
pub use groups::KeycloakGroupRepository;
pub use token::KeycloakTokenRepository;
pub use users::KeycloakUserRepository;
