//! Restartable, pull-based lazy sequences.

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

/// A single pass over a source: returns the next value, `None` on exhaustion.
type Producer<'a, T, E> = Box<dyn FnMut() -> Result<Option<T>, E> + 'a>;

/// Builds a fresh producer for every new pass.
type Opener<'a, T, E> = Rc<dyn Fn() -> Producer<'a, T, E> + 'a>;

/// How a sequence behaves when a second cursor is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Every cursor starts again from the first value.
    Restartable,
    /// Only the first cursor sees values; later cursors are empty.
    OneShot,
}

/// A lazily evaluated sequence of `T` whose source may fail with `E`.
///
/// Values are computed only when a [`Cursor`] pulls them, one at a time.
/// Combinators (`map`, `filter`, `take`, ...) wrap the pipeline without
/// pulling anything, and are applied in the order they were added.
///
/// A sequence is a description of a pipeline. Iterating it needs a cursor, and
/// each call to [`cursor`](Self::cursor) starts a new pass:
///
/// - over a [`SourceKind::Restartable`] source the new pass sees every value
///   again;
/// - over a [`SourceKind::OneShot`] source (an open reader, a consumed
///   producer) only the first cursor ever sees values. Any later cursor is
///   exhausted immediately, even if the first pass stopped early.
///
/// Infinite sources never stop on their own; bound them with
/// [`take`](Self::take) or stop pulling.
///
/// ```
/// use lazymemo::sequence::sources::naturals;
///
/// let squares = naturals().filter(|n| n % 2 == 0).map(|n| n * n).take(3);
/// assert_eq!(squares.collect_vec().unwrap(), vec![4, 16, 36]);
/// ```
pub struct LazySequence<'a, T, E = Infallible> {
    open: Opener<'a, T, E>,
    kind: SourceKind,
}

impl<'a, T: 'a, E: 'a> LazySequence<'a, T, E> {
    /// Creates a restartable sequence.
    ///
    /// `open` is called once per cursor and must return a producer that yields
    /// `Ok(Some(value))`, `Ok(None)` when done, or `Err` on failure. Nothing is
    /// called until the first cursor is requested.
    pub fn create<F, P>(open: F) -> Self
    where
        F: Fn() -> P + 'a,
        P: FnMut() -> Result<Option<T>, E> + 'a,
    {
        Self::from_opener(move || Box::new(open()), SourceKind::Restartable)
    }

    /// Creates a one-shot sequence around a single producer.
    ///
    /// The first cursor takes ownership of `producer`. Cursors requested after
    /// that yield nothing.
    pub fn once<P>(producer: P) -> Self
    where
        P: FnMut() -> Result<Option<T>, E> + 'a,
    {
        let slot = RefCell::new(Some(producer));
        Self::from_opener(
            move || -> Producer<'a, T, E> {
                match slot.borrow_mut().take() {
                    Some(producer) => Box::new(producer),
                    None => {
                        tracing::debug!("one-shot source already consumed, new pass is empty");
                        Box::new(|| -> Result<Option<T>, E> { Ok(None) })
                    }
                }
            },
            SourceKind::OneShot,
        )
    }

    /// Creates a restartable sequence over a cloneable iterable.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'a,
        I::IntoIter: 'a,
    {
        Self::create(move || {
            let mut iter = iterable.clone().into_iter();
            move || -> Result<Option<T>, E> { Ok(iter.next()) }
        })
    }

    fn from_opener<F>(open: F, kind: SourceKind) -> Self
    where
        F: Fn() -> Producer<'a, T, E> + 'a,
    {
        Self {
            open: Rc::new(open),
            kind,
        }
    }

    /// Returns how the underlying source behaves across passes.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Whether a new cursor replays the sequence from the start.
    pub fn is_restartable(&self) -> bool {
        self.kind == SourceKind::Restartable
    }

    /// Applies `transform` to each pulled value.
    pub fn map<U, F>(self, transform: F) -> LazySequence<'a, U, E>
    where
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        self.try_map(move |value| Ok(transform(value)))
    }

    /// Applies a fallible `transform` to each pulled value.
    ///
    /// An `Err` reaches the consumer at the pull that produced it, and ends
    /// that pass.
    pub fn try_map<U, F>(self, transform: F) -> LazySequence<'a, U, E>
    where
        U: 'a,
        F: Fn(T) -> Result<U, E> + 'a,
    {
        let transform = Rc::new(transform);
        let upstream = self.open;
        LazySequence::from_opener(
            move || {
                let mut pull = upstream();
                let transform = Rc::clone(&transform);
                Box::new(move || -> Result<Option<U>, E> {
                    match pull()? {
                        Some(value) => transform(value).map(Some),
                        None => Ok(None),
                    }
                })
            },
            self.kind,
        )
    }

    /// Keeps only the values for which `predicate` returns `true`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'a,
    {
        self.try_filter(move |value| Ok(predicate(value)))
    }

    /// Keeps only the values for which a fallible `predicate` returns `Ok(true)`.
    pub fn try_filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> Result<bool, E> + 'a,
    {
        let predicate = Rc::new(predicate);
        let upstream = self.open;
        Self::from_opener(
            move || {
                let mut pull = upstream();
                let predicate = Rc::clone(&predicate);
                Box::new(move || -> Result<Option<T>, E> {
                    while let Some(value) = pull()? {
                        if predicate(&value)? {
                            return Ok(Some(value));
                        }
                    }
                    Ok(None)
                })
            },
            self.kind,
        )
    }

    /// Yields at most `limit` values, never pulling upstream past the last one.
    pub fn take(self, limit: usize) -> Self {
        let upstream = self.open;
        Self::from_opener(
            move || {
                let mut pull = upstream();
                let mut remaining = limit;
                Box::new(move || -> Result<Option<T>, E> {
                    if remaining == 0 {
                        return Ok(None);
                    }
                    let next = pull()?;
                    remaining = if next.is_some() { remaining - 1 } else { 0 };
                    Ok(next)
                })
            },
            self.kind,
        )
    }

    /// Pairs every value with its zero-based position in the pass.
    pub fn enumerate(self) -> LazySequence<'a, (usize, T), E> {
        let upstream = self.open;
        LazySequence::from_opener(
            move || {
                let mut pull = upstream();
                let mut index = 0;
                Box::new(move || -> Result<Option<(usize, T)>, E> {
                    Ok(pull()?.map(|value| {
                        let item = (index, value);
                        index += 1;
                        item
                    }))
                })
            },
            self.kind,
        )
    }

    /// Converts upstream errors with `convert`.
    pub fn map_err<E2, F>(self, convert: F) -> LazySequence<'a, T, E2>
    where
        E2: 'a,
        F: Fn(E) -> E2 + 'a,
    {
        let convert = Rc::new(convert);
        let upstream = self.open;
        LazySequence::from_opener(
            move || {
                let mut pull = upstream();
                let convert = Rc::clone(&convert);
                Box::new(move || -> Result<Option<T>, E2> { pull().map_err(|err| convert(err)) })
            },
            self.kind,
        )
    }

    /// Starts a new pass over the sequence.
    pub fn cursor(&self) -> Cursor<'a, T, E> {
        Cursor {
            pull: (self.open)(),
            state: CursorState::Active,
            position: 0,
        }
    }

    /// Alias for [`cursor`](Self::cursor), for use in `for` loops.
    pub fn iter(&self) -> Cursor<'a, T, E> {
        self.cursor()
    }

    /// Materializes a new pass. Never call this on an unbounded sequence.
    pub fn collect_vec(&self) -> Result<Vec<T>, E> {
        self.cursor().collect()
    }
}

impl<'a, T: 'a> LazySequence<'a, T, Infallible> {
    /// Lifts an infallible sequence into one that can carry `E2`, so that
    /// fallible combinators can be chained onto it.
    pub fn fallible<E2: 'a>(self) -> LazySequence<'a, T, E2> {
        self.map_err(|never| match never {})
    }
}

impl<'a, T, E> Clone for LazySequence<'a, T, E> {
    /// Clones share the source: clones of a one-shot sequence share its
    /// single pass.
    fn clone(&self) -> Self {
        Self {
            open: Rc::clone(&self.open),
            kind: self.kind,
        }
    }
}

impl<'a, T, E> fmt::Debug for LazySequence<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<'s, 'a, T: 'a, E: 'a> IntoIterator for &'s LazySequence<'a, T, E> {
    type Item = Result<T, E>;
    type IntoIter = Cursor<'a, T, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Active,
    Exhausted,
    Failed,
}

/// One forward-only pass over a [`LazySequence`].
///
/// [`pull`](Self::pull) separates the three outcomes: `Ok(Some(v))` is a
/// value, `Ok(None)` is exhaustion, and `Err(e)` is the source's own error.
/// Once a cursor is exhausted or has failed, every later pull returns
/// `Ok(None)`. Failures are not retried.
pub struct Cursor<'a, T, E> {
    pull: Producer<'a, T, E>,
    state: CursorState,
    position: usize,
}

impl<'a, T, E> Cursor<'a, T, E> {
    /// Pulls the next value through the pipeline.
    pub fn pull(&mut self) -> Result<Option<T>, E> {
        if self.state != CursorState::Active {
            return Ok(None);
        }

        match (self.pull)() {
            Ok(Some(value)) => {
                self.position += 1;
                Ok(Some(value))
            }
            Ok(None) => {
                self.state = CursorState::Exhausted;
                tracing::trace!(yielded = self.position, "sequence exhausted");
                Ok(None)
            }
            Err(err) => {
                self.state = CursorState::Failed;
                tracing::trace!(yielded = self.position, "sequence failed");
                Err(err)
            }
        }
    }

    /// Number of values yielded so far in this pass.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether this pass has ended, by exhaustion or failure.
    pub fn is_finished(&self) -> bool {
        self.state != CursorState::Active
    }

    /// Whether this pass ended with an upstream error.
    pub fn has_failed(&self) -> bool {
        self.state == CursorState::Failed
    }
}

impl<'a, T, E> Iterator for Cursor<'a, T, E> {
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull().transpose()
    }
}

impl<'a, T, E> FusedIterator for Cursor<'a, T, E> {}

impl<'a, T, E> fmt::Debug for Cursor<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
