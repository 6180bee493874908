//! Configuration module for docindex.
//!
//! This module provides all configuration types and parsing logic:
//! - `Config` - Root configuration container
//! - `IndexConfig` - Document source and index construction settings
//! - `SearchConfig` - Result limits
//! - `Http` - HTTP API settings

mod parser;
mod types;

pub use parser::{load_config, parse_config};
pub use types::*;
