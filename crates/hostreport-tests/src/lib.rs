//! hostreport End-to-End Test Infrastructure
//!
//! This crate provides integration tests for report assembly across whole
//! host directories:
//!
//! - Discovery: host directories on disk -> located series
//! - Assembly: located series -> graph specs, per report type
//! - Batch: many hosts -> isolated per-report outcomes
//!
//! No rrdtool installation is needed. Timestamps come from [`fixtures::FakeStore`]
//! and specs are captured by [`fixtures::RecordingRenderer`].
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hostreport-tests
//! ```

pub mod fixtures;
