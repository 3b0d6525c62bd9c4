//! Core Urhobo client library (API adapter, session, state, flows, search).

pub mod account;
pub mod api;
pub mod config;
pub mod flows;
pub mod guard;
pub mod search;
pub mod session;
pub mod store;
pub mod validation;
