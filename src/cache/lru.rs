//! LRU-bounded memoization for plain functions.

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(99);

/// Memoizer statistics.
#[derive(Debug, Clone, Default)]
pub struct MemoStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of cache hits.
    pub hits: u64,

    /// Number of cache misses.
    pub misses: u64,
}

impl MemoStats {
    /// Computes the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Wraps an expensive function `func(&K) -> V` with a bounded LRU cache.
///
/// Unlike [`Evaluator`](crate::memo::Evaluator), entries may be evicted once
/// `capacity` is reached, so memory stays bounded. Use it for non-recursive
/// functions called repeatedly with the same arguments.
pub struct Memoized<K, V, F> {
    func: F,
    cache: LruCache<K, V>,
    hits: u64,
    misses: u64,
}

impl<K, V, F> Memoized<K, V, F>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone,
{
    /// Creates a memoizer holding at most `capacity` entries.
    ///
    /// A capacity of zero falls back to 100.
    pub fn new(func: F, capacity: usize) -> Self
    where
        F: FnMut(&K) -> V,
    {
        Self::with_capacity(func, capacity)
    }

    /// Creates a memoizer for a fallible function, used with
    /// [`try_call`](Self::try_call).
    pub fn fallible<E>(func: F, capacity: usize) -> Self
    where
        F: FnMut(&K) -> Result<V, E>,
    {
        Self::with_capacity(func, capacity)
    }

    fn with_capacity(func: F, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            func,
            cache: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the cached result for `key`, computing it on a miss.
    pub fn call(&mut self, key: &K) -> V
    where
        F: FnMut(&K) -> V,
    {
        if let Some(value) = self.lookup(key) {
            return value;
        }
        let value = (self.func)(key);
        self.cache.put(key.clone(), value.clone());
        value
    }

    /// Like [`call`](Self::call) for a fallible function. Errors are not cached.
    pub fn try_call<E>(&mut self, key: &K) -> Result<V, E>
    where
        F: FnMut(&K) -> Result<V, E>,
    {
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }
        let value = (self.func)(key)?;
        self.cache.put(key.clone(), value.clone());
        Ok(value)
    }

    fn lookup(&mut self, key: &K) -> Option<V> {
        match self.cache.get(key) {
            Some(value) => {
                self.hits += 1;
                tracing::trace!(?key, "memo hit");
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                tracing::trace!(?key, "memo miss");
                None
            }
        }
    }

    /// Whether `key` is cached. Does not update recency.
    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    /// Removes a specific entry.
    pub fn invalidate(&mut self, key: &K) {
        self.cache.pop(key);
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<K: Hash + Eq, V, F> fmt::Debug for Memoized<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("size", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hit_after_miss() {
        let computed = Cell::new(0);
        let mut square = Memoized::new(
            |n: &u64| {
                computed.set(computed.get() + 1);
                n * n
            },
            10,
        );

        assert_eq!(square.call(&5), 25);
        assert_eq!(square.call(&10), 100);
        assert_eq!(square.call(&5), 25);
        assert_eq!(square.call(&10), 100);

        assert_eq!(computed.get(), 2);
        let stats = square.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.size, 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut double = Memoized::new(|n: &i32| n * 2, 2);

        double.call(&1);
        double.call(&2);
        double.call(&3); // Evicts 1

        assert!(!double.contains(&1));
        assert!(double.contains(&2));
        assert!(double.contains(&3));
    }

    #[test]
    fn test_zero_capacity_falls_back() {
        let memo = Memoized::new(|n: &i32| *n, 0);
        assert_eq!(memo.stats().capacity, 100);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let attempts = Cell::new(0);
        let mut flaky = Memoized::fallible(
            |n: &u32| {
                attempts.set(attempts.get() + 1);
                if attempts.get() == 1 {
                    Err("unavailable")
                } else {
                    Ok(n + 1)
                }
            },
            10,
        );

        assert_eq!(flaky.try_call(&1), Err("unavailable"));
        assert_eq!(flaky.try_call(&1), Ok(2));
        assert_eq!(flaky.try_call(&1), Ok(2));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut ident = Memoized::new(|s: &String| s.len(), 10);

        ident.call(&"a".to_string());
        ident.call(&"bb".to_string());
        ident.invalidate(&"a".to_string());
        assert!(!ident.contains(&"a".to_string()));

        ident.clear();
        assert_eq!(ident.stats().size, 0);
    }

    #[test]
    fn test_stats_hit_rate() {
        let mut memo = Memoized::new(|n: &u8| *n, 10);
        memo.call(&1); // Miss
        memo.call(&2); // Miss
        memo.call(&1); // Hit

        assert!((memo.stats().hit_rate() - 0.333).abs() < 0.01);
    }
}
