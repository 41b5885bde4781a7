//! Memoizing evaluator for pure recursive functions.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;

use crate::types::errors::EvalError;

/// Signature of a recurrence: receives the requested key and a handle for
/// memoized sub-requests.
pub type Recurrence<'a, K, V, E> =
    dyn Fn(&K, &mut Recurse<'_, K, V, E>) -> Result<V, EvalError<E>> + 'a;

type Validator<'a, K> = dyn Fn(&K) -> Result<(), String> + 'a;

/// Default limit on nested cache misses.
///
/// Every miss costs a native stack frame, so the limit keeps a long recurrence
/// chain well inside a 2 MiB thread stack. Raise it with
/// [`Evaluator::with_max_depth`] on threads with larger stacks, or evaluate
/// keys in ascending order with [`Evaluator::evaluate_all`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Evaluator statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Entries currently cached, base cases included.
    pub entries: usize,

    /// Requests answered from the cache.
    pub hits: u64,

    /// Requests that ran the recurrence.
    pub misses: u64,
}

impl EvalStats {
    /// Fraction of requests answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Memo<K, V> {
    cache: HashMap<K, V>,
    hits: u64,
    misses: u64,
}

/// Marks a key as being computed; the mark is removed on drop, unwinding
/// included.
struct InProgress<'r, K: Eq + Hash> {
    set: &'r RefCell<HashSet<K>>,
    key: K,
}

impl<K: Eq + Hash> Drop for InProgress<'_, K> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.key);
    }
}

/// Handle passed to the recurrence for requesting sub-results.
///
/// Sub-requests go through the same cache and validator as
/// [`Evaluator::evaluate`].
pub struct Recurse<'r, K, V, E> {
    memo: &'r mut Memo<K, V>,
    in_progress: &'r RefCell<HashSet<K>>,
    recurrence: &'r Recurrence<'r, K, V, E>,
    validator: Option<&'r Validator<'r, K>>,
    max_depth: usize,
}

impl<'r, K, V, E> Recurse<'r, K, V, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Returns the memoized value for `key`, computing it on first request.
    pub fn eval(&mut self, key: K) -> Result<V, EvalError<E>> {
        if let Some(validate) = self.validator {
            validate(&key).map_err(EvalError::Validation)?;
        }

        if let Some(value) = self.memo.cache.get(&key) {
            self.memo.hits += 1;
            tracing::trace!(?key, "cache hit");
            return Ok(value.clone());
        }

        {
            let mut in_progress = self.in_progress.borrow_mut();
            if in_progress.contains(&key) {
                return Err(EvalError::Validation(format!(
                    "cyclic request for {key:?} while it is being computed"
                )));
            }
            if in_progress.len() >= self.max_depth {
                tracing::debug!(?key, max_depth = self.max_depth, "recursion depth limit reached");
                return Err(EvalError::Validation(format!(
                    "recursion depth limit of {} reached at {key:?}",
                    self.max_depth
                )));
            }
            in_progress.insert(key.clone());
        }
        let _mark = InProgress {
            set: self.in_progress,
            key: key.clone(),
        };

        self.memo.misses += 1;
        tracing::trace!(?key, "cache miss, running recurrence");

        let recurrence = self.recurrence;
        let value = recurrence(&key, self)?;
        Ok(self.memo.cache.entry(key).or_insert(value).clone())
    }
}

/// Computes `f(k)` for a pure recursive `f`, at most once per key.
///
/// The cache is owned by the evaluator: it is seeded with the base cases,
/// only ever grows, and is dropped with the evaluator. An entry is never
/// overwritten. Callers that need bounded memory use one evaluator per batch.
///
/// ```
/// use lazymemo::memo::Evaluator;
///
/// let mut fib: Evaluator<u32, u64> = Evaluator::new([(0, 0), (1, 1)], |n, fib| {
///     Ok(fib.eval(n - 1)? + fib.eval(n - 2)?)
/// });
/// assert_eq!(fib.evaluate(10), Ok(55));
/// ```
pub struct Evaluator<'a, K, V, E = Infallible> {
    memo: Memo<K, V>,
    in_progress: RefCell<HashSet<K>>,
    recurrence: Box<Recurrence<'a, K, V, E>>,
    validator: Option<Box<Validator<'a, K>>>,
    max_depth: usize,
}

impl<'a, K, V, E> Evaluator<'a, K, V, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Creates an evaluator whose cache is seeded with `base_cases`.
    pub fn new<B, R>(base_cases: B, recurrence: R) -> Self
    where
        B: IntoIterator<Item = (K, V)>,
        R: Fn(&K, &mut Recurse<'_, K, V, E>) -> Result<V, EvalError<E>> + 'a,
    {
        let cache: HashMap<K, V> = base_cases.into_iter().collect();
        tracing::debug!(base_cases = cache.len(), "evaluator created");

        Self {
            memo: Memo {
                cache,
                hits: 0,
                misses: 0,
            },
            in_progress: RefCell::new(HashSet::new()),
            recurrence: Box::new(recurrence),
            validator: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Rejects keys for which `validator` returns `Err`.
    ///
    /// Runs on every request, including sub-requests, before the cache is
    /// consulted, so an invalid key never reaches the recurrence.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&K) -> Result<(), String> + 'a,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Limits how many cache misses may be nested inside one another.
    ///
    /// A request that would go deeper fails with [`EvalError::Validation`]
    /// instead of overflowing the stack. Defaults to [`DEFAULT_MAX_DEPTH`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns `f(key)`, running the recurrence only on a cache miss.
    ///
    /// On error nothing is cached for `key`. Sub-results completed before the
    /// failure stay cached.
    pub fn evaluate(&mut self, key: K) -> Result<V, EvalError<E>> {
        let mut recurse = Recurse {
            memo: &mut self.memo,
            in_progress: &self.in_progress,
            recurrence: &*self.recurrence,
            validator: self.validator.as_deref(),
            max_depth: self.max_depth,
        };
        recurse.eval(key)
    }

    /// Evaluates `keys` in order.
    ///
    /// Ascending keys keep the recursion depth small, since each key finds
    /// its predecessors already cached.
    pub fn evaluate_all<I>(&mut self, keys: I) -> Result<Vec<V>, EvalError<E>>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| self.evaluate(key)).collect()
    }

    /// Cached value for `key`, without computing anything.
    pub fn cached(&self, key: &K) -> Option<&V> {
        self.memo.cache.get(key)
    }

    /// Whether `key` has been computed or seeded.
    pub fn contains(&self, key: &K) -> bool {
        self.memo.cache.contains_key(key)
    }

    /// Number of cached entries, base cases included.
    pub fn cache_size(&self) -> usize {
        self.memo.cache.len()
    }

    /// Returns evaluator statistics.
    pub fn stats(&self) -> EvalStats {
        EvalStats {
            entries: self.memo.cache.len(),
            hits: self.memo.hits,
            misses: self.memo.misses,
        }
    }
}

impl<'a, K, V, E> fmt::Debug for Evaluator<'a, K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("entries", &self.memo.cache.len())
            .field("hits", &self.memo.hits)
            .field("misses", &self.memo.misses)
            .finish_non_exhaustive()
    }
}
