//! CLI command handlers.

pub mod account;
pub mod auth;
pub mod config;
pub mod language;
pub mod reset;
pub mod search;
pub mod word;
