//! Taskboard server library.
//!
//! Exposes the task store, the query/filter layer, and the HTTP routes for
//! use in tests and embedding.

pub mod config;
pub mod error;
pub mod query;
pub mod routes;
pub mod store;
