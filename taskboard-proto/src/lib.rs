//! Shared data model and wire definitions for Taskboard.

pub mod api;
pub mod codec;
pub mod input;
pub mod query;
pub mod tags;
pub mod task;
