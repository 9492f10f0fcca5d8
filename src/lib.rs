//! Turnplan: lathe turnability classification and turning process planning
//!
//! Reads a geometry digest of a solid part, decides whether (and how much of)
//! it can be made on a 2-axis lathe, and synthesizes a validated turning
//! process plan with tools, speeds, feeds and cycle time.

pub mod cli;
pub mod core;
pub mod yaml;
