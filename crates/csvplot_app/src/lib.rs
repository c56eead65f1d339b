//! Headless host for the csvplot state machine.
pub mod cli;
pub mod platform;
