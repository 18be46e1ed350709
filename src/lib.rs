//! Back office console for an agency's leads and clients.
//!
//! Records live in in-memory stores (see [`store`]), are validated from raw
//! form values (see [`validation`]) and exposed through an axum router
//! (see [`handler::router`]).

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod lead;
pub mod query;
pub mod stats;
pub mod store;
pub mod validation;
