//! Grammarforge - compile tree-sitter grammars to WebAssembly
//!
//! This library builds a set of independently packaged tree-sitter grammars
//! with the `tree-sitter` CLI, in parallel, and publishes the resulting
//! `.wasm` files to a single output directory. The directory ends up either
//! complete or empty.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Manifest, recipes, item runner, scheduler and run controller
//! - [`infra`] - Infrastructure layer (filesystem, processes, git)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
