//! Lazy, pull-based sequences.
//!
//! A [`LazySequence`] describes a pipeline: a source plus an ordered chain of
//! `map`/`filter`/`take` stages. Nothing runs until a [`Cursor`] pulls, and
//! each pull moves exactly one value through the chain.
//!
//! ## Sources
//!
//! - [`sources::range`] / [`sources::range_step`] - bounded numeric ranges
//! - [`sources::naturals`] - infinite counter
//! - [`sources::file_lines`] / [`sources::reader_lines`] - line streaming
//! - [`sources::csv_records`] - filtered user rows from a CSV file
//! - [`sources::paginate`] / [`sources::api_pages`] - batched records
//! - [`sources::prefixed_ids`] - infinite ID generator
//!
//! ## Example
//!
//! ```rust
//! use lazymemo::sequence::sources::range;
//!
//! let doubled = range(1, 5).map(|n| n * 2);
//! assert_eq!(doubled.collect_vec().unwrap(), vec![2, 4, 6, 8, 10]);
//! // A new cursor is a new pass.
//! assert_eq!(doubled.collect_vec().unwrap(), vec![2, 4, 6, 8, 10]);
//! ```

mod lazy;
pub mod sources;

pub use lazy::{Cursor, LazySequence, SourceKind};
