//! Bounded memoization for expensive non-recursive functions.
//!
//! [`Memoized`] keeps the most recently used results in an LRU cache, with
//! hit/miss counters. Recursive functions that need every sub-result kept for
//! the evaluator's lifetime belong in [`crate::memo::Evaluator`] instead.

mod lru;

pub use self::lru::{MemoStats, Memoized};
