//! CLI command implementations for callgauge operations.
//!
//! Available commands:
//! - **analyze**: run the record pipeline over a saved export payload
//! - **init**: initialize a new callgauge configuration file

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
