//! Taskboard client library.
//!
//! [`client::TaskClient`] talks to the task server. [`board::TaskBoard`]
//! keeps a [`cache::TaskListCache`] in step with it, applying mutations
//! optimistically and re-deriving the list from the server afterwards.

pub mod board;
pub mod cache;
pub mod client;
pub mod config;
pub mod validate;
pub mod view;
