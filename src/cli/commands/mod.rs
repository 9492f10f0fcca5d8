//! CLI command implementations

pub mod batch;
pub mod classify;
pub mod completions;
pub mod plan;
pub mod profiles;
