//! Workspace facade crate.
//!
//! Re-exports the decoding services from `core-decode` and the logging setup
//! from `core-runtime`, so host applications can depend on `mp3-slice` alone
//! and enable the documented features without wiring each crate individually.

pub use core_decode::*;
pub use core_runtime::logging;
