//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **keycloak**: the four repository ports over the Keycloak admin REST API
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod keycloak;
mod macros;
