//! Memoized Fibonacci built on [`Evaluator`].

use super::Evaluator;
use crate::types::errors::EvalError;
use crate::{LazyMemoError, LazyMemoResult};

/// Largest `n` for which `F(n)` fits in a `u128`.
pub const MAX_FIBONACCI_INPUT: i64 = 186;

/// Fibonacci evaluator over `u128` values.
pub type Fibonacci = Evaluator<'static, i64, u128, LazyMemoError>;

/// Creates a Fibonacci evaluator with base cases `F(0) = 0`, `F(1) = 1`.
///
/// Negative inputs and inputs above [`MAX_FIBONACCI_INPUT`] are rejected
/// before any recursion. The addition is checked too, so a result is never
/// wrapped.
pub fn fibonacci() -> Fibonacci {
    fibonacci_bounded(MAX_FIBONACCI_INPUT)
}

/// Like [`fibonacci`], but also rejects inputs above `max`.
///
/// `max` is clamped to [`MAX_FIBONACCI_INPUT`].
pub fn fibonacci_bounded(max: i64) -> Fibonacci {
    let max = max.min(MAX_FIBONACCI_INPUT);

    Evaluator::new([(0i64, 0u128), (1, 1)], |n: &i64, fib| {
        let a = fib.eval(n - 1)?;
        let b = fib.eval(n - 2)?;
        a.checked_add(b)
            .ok_or_else(|| EvalError::upstream(LazyMemoError::Overflow(n.to_string())))
    })
    .with_validator(move |n| {
        if *n < 0 {
            Err(format!("n must be non-negative, got {n}"))
        } else if *n > max {
            Err(format!("n must be at most {max}, got {n}"))
        } else {
            Ok(())
        }
    })
}

/// Returns `F(0)..=F(n)`, evaluated in ascending order.
pub fn fibonacci_sequence(fib: &mut Fibonacci, n: i64) -> LazyMemoResult<Vec<u128>> {
    if n < 0 {
        return Err(LazyMemoError::validation(format!(
            "n must be non-negative, got {n}"
        )));
    }
    Ok(fib.evaluate_all(0..=n)?)
}
