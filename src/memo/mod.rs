//! Memoized recursive evaluation.
//!
//! [`Evaluator`] turns a pure recurrence into a cached evaluator: every
//! distinct input is computed at most once per instance. The cache belongs to
//! the evaluator, so there is no shared or global state.
//!
//! ## Example
//!
//! ```rust
//! use lazymemo::memo::fibonacci;
//!
//! let mut fib = fibonacci();
//! assert_eq!(fib.evaluate(10).unwrap(), 55);
//! assert_eq!(fib.cache_size(), 11);
//! ```

mod evaluator;
mod fibonacci;

pub use evaluator::{EvalStats, Evaluator, Recurrence, Recurse, DEFAULT_MAX_DEPTH};
pub use fibonacci::{
    fibonacci, fibonacci_bounded, fibonacci_sequence, Fibonacci, MAX_FIBONACCI_INPUT,
};
