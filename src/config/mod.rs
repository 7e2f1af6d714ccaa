//! Configuration module for Media-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is equivalent to loading
//! an empty one.
//!
//! # Example
//!
//! ```no_run
//! use media_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Known extensions: {:?}", config.download.known_extensions);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DownloadConfig, ExtractionConfig, FetchConfig, LinkPattern, OutputConfig,
    DEFAULT_EXTENSIONS, ORIGIN_RELATIVE_PATTERN, PROTOCOL_RELATIVE_PATTERN,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
