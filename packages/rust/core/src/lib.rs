//! Core pipeline for readmepack.
//!
//! Classifies entries, mirrors the documentation tree with normalized front
//! matter, and zips the result (e.g., `run_pack`).

pub mod archive;
pub mod classify;
pub mod pipeline;
pub mod walker;
