//! CLI command implementations

pub mod browse;
pub mod config;
pub mod edit;
pub mod inspect;
