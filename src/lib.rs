//! Codetree - Build structural maps of mixed-language codebases
//!
//! Walks a directory tree, extracts per-file symbol outlines and import
//! lists, resolves imports into a cross-file dependency graph, and emits the
//! whole model as a JSON artifact for downstream tooling.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod language;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{Analyzer, Artifact, FileRecord};
pub use config::Config;
pub use error::{Error, Result};
pub use language::Language;
