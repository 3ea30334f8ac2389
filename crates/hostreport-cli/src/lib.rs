//! hostreport CLI library.
//!
//! This crate provides the batch plotting command behind the `hostreport`
//! binary and the parsing of its argument values.

pub mod commands;
pub mod input;
