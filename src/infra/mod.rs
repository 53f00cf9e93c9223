//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem, external processes and git.

pub mod filesystem;
pub mod git;
pub mod locate;
pub mod process;
