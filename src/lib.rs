//! # lazymemo
//!
//! Lazy, restartable sequence pipelines and memoized recursive evaluation.
//!
//! ## Modules
//!
//! - [`sequence`] - Pull-based lazy sequences and ready-made sources
//! - [`memo`] - Memoizing evaluator for recursive definitions
//! - [`cache`] - Bounded LRU memoizer for plain functions
//! - [`cli`] - Command-line interface (feature `cli`)
//! - [`types`] - Shared types

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod memo;
pub mod sequence;
pub mod types;

pub use memo::Evaluator;
pub use sequence::LazySequence;
pub use types::config::Config;
pub use types::errors::{EvalError, LazyMemoError, LazyMemoResult};
