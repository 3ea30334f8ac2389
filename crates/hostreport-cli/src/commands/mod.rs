//! CLI command implementations

pub mod plot;
