//! Inbound adapters that turn caller input into intents.

pub mod cli;
