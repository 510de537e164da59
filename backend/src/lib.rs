//! Administrative façade over a Keycloak identity backend.
//!
//! Callers build a command or query from [`application`], hand it to the
//! [`application::Dispatcher`], and receive a single [`domain::AdminResult`].
//! The [`outbound::keycloak`] adapters implement the repository ports; the
//! [`inbound::cli`] adapter drives the dispatcher from the command line.

pub mod application;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
