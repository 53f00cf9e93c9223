//! Core business logic module
//!
//! # Submodules
//!
//! - [`manifest`] - Grammar manifest (`package.json`) and version specifiers
//! - [`recipe`] - Build steps and the recipe table
//! - [`config`] - Layered run configuration
//! - [`item`] - Grammar items, states and outcomes
//! - [`fetch`] - Fetch override from version control
//! - [`builder`] - Step executor and item runner
//! - [`scheduler`] - Bounded parallel scheduling
//! - [`run`] - Run controller and output directory contract

pub mod builder;
pub mod config;
pub mod fetch;
pub mod item;
pub mod manifest;
pub mod recipe;
pub mod run;
pub mod scheduler;
