//! CLI command implementations

pub mod config;
pub mod generate;
pub mod score;
pub mod serve;
pub mod status;
