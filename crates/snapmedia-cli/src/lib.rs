//! snapmedia CLI library entry.
//!
//! Wires config, input classification, the core decoder, batch execution and
//! metrics together. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app;
pub mod batch;
pub mod config;
pub mod input;
pub mod obs;
