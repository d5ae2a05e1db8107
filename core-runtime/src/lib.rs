//! # Core Runtime Module
//!
//! Provides the runtime infrastructure shared by the decoding crates:
//! - Logging and tracing setup
//! - Log field helpers
//!
//! ## Overview
//!
//! Library crates in this workspace only emit `tracing` events. Installing a
//! subscriber is left to the host, which calls [`logging::init_logging`] once
//! during startup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
