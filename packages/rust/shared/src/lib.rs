//! Shared types, error model, and configuration for readmepack.
//!
//! This crate is the foundation depended on by all other readmepack crates.
//! It provides:
//! - [`ReadmePackError`] — the unified error type
//! - Domain types ([`PackVariant`], [`LineEnding`], [`TocMarkers`])
//! - Configuration ([`AppConfig`], [`PackOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, MarkdownSection, PackOptions, PackOverrides, PackSection, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ReadmePackError, Result};
pub use types::{
    DEFAULT_TOC_END_TAG, DEFAULT_TOC_START_TAG, LineEnding, PackVariant, TocMarkers,
};
