//! Application layer: intents, their handlers and the dispatcher.
//!
//! Callers build a command or query, then hand it to [`Dispatcher::dispatch`]
//! with a cancellation token. Handlers translate the intent into repository
//! port calls and compose a single outcome.

pub mod commands;
pub mod dispatcher;
pub mod handlers;
pub mod queries;
pub mod request;

pub use self::dispatcher::{Dispatcher, RepositoryPorts, Route};
pub use self::request::{Handler, Request};
