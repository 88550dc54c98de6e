//! Sado - a signed app wrapper
//!
//! This crate provides the core functionality for sado, including:
//! - Allow-list storage backed by a persisted per-domain key-value file
//! - Exact-invocation command validation (fail-open when unconfigured)
//! - Process replacement via execv
//! - Responsibility disclaim via posix_spawn and a late-bound private symbol

pub mod cli;
pub mod launch;
pub mod store;

pub use store::{CommandList, CommandStore, StoreScope};
