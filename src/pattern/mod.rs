//! Ordered predicate dispatch.
//!
//! A [`Matcher`] holds `(predicate, handler)` pairs in the order they were
//! added. Dispatching a subject evaluates the predicates strictly in that
//! order and runs the handler of the first case that accepts it; later
//! predicates are never evaluated.
//!
//! The predicate helpers [`equals`], [`in_range`], [`any`] and [`not`]
//! build the common predicates.
//!
//! # Examples
//!
//! ```rust
//! use graham::pattern::{Matcher, in_range};
//!
//! let classify = Matcher::<i32, String>::new()
//!     .when_eq(0, |_| "zero".to_string())
//!     .case(|n: &i32| *n < 0, |_| "negative".to_string())
//!     .case(in_range(1, 9), |n| format!("digit {n}"))
//!     .otherwise(|_| "large".to_string());
//!
//! assert_eq!(classify.dispatch(&0).unwrap(), "zero");
//! assert_eq!(classify.dispatch(&7).unwrap(), "digit 7");
//! assert_eq!(classify.dispatch(&-3).unwrap(), "negative");
//! assert_eq!(classify.dispatch(&120).unwrap(), "large");
//! ```

use std::fmt;

use crate::error::NoMatchError;

type Predicate<S> = Box<dyn Fn(&S) -> bool>;
type Handler<S, R> = Box<dyn Fn(&S) -> R>;

/// One `(predicate, handler)` pair of a [`Matcher`].
pub struct Case<S: ?Sized, R> {
    predicate: Predicate<S>,
    handler: Handler<S, R>,
}

impl<S: ?Sized, R> Case<S, R> {
    /// Pairs a predicate with the handler it guards.
    pub fn new<P, H>(predicate: P, handler: H) -> Self
    where
        P: Fn(&S) -> bool + 'static,
        H: Fn(&S) -> R + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        }
    }

    /// Returns `true` if this case accepts `subject`.
    pub fn accepts(&self, subject: &S) -> bool {
        (self.predicate)(subject)
    }

    /// Runs the handler on `subject` without consulting the predicate.
    pub fn apply(&self, subject: &S) -> R {
        (self.handler)(subject)
    }
}

impl<S: ?Sized, R> fmt::Debug for Case<S, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Case")
    }
}

/// An ordered list of cases dispatched first-match-wins.
pub struct Matcher<S: ?Sized, R> {
    cases: Vec<Case<S, R>>,
}

impl<S: ?Sized, R> Default for Matcher<S, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, R> Matcher<S, R> {
    /// Creates a matcher with no cases.
    #[must_use]
    pub const fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Appends a case guarded by `predicate`.
    #[must_use]
    pub fn case<P, H>(mut self, predicate: P, handler: H) -> Self
    where
        P: Fn(&S) -> bool + 'static,
        H: Fn(&S) -> R + 'static,
    {
        self.cases.push(Case::new(predicate, handler));
        self
    }

    /// Appends a case accepting subjects equal to `expected`.
    #[must_use]
    pub fn when_eq<V, H>(self, expected: V, handler: H) -> Self
    where
        S: PartialEq<V> + 'static,
        V: 'static,
        H: Fn(&S) -> R + 'static,
    {
        self.case(equals(expected), handler)
    }

    /// Appends a case accepting every subject.
    ///
    /// Cases added after it are unreachable.
    #[must_use]
    pub fn otherwise<H>(self, handler: H) -> Self
    where
        S: 'static,
        H: Fn(&S) -> R + 'static,
    {
        self.case(any(), handler)
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if no case has been added.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Runs the handler of the first case accepting `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`NoMatchError`] if every case rejects `subject`.
    pub fn dispatch(&self, subject: &S) -> Result<R, NoMatchError> {
        self.cases
            .iter()
            .find(|case| case.accepts(subject))
            .map(|case| case.apply(subject))
            .ok_or_else(|| {
                tracing::debug!(cases = self.cases.len(), "no case accepted the subject");
                NoMatchError {
                    cases: self.cases.len(),
                }
            })
    }

    /// Like [`dispatch`](Self::dispatch), returning `default` when no case
    /// accepts `subject`.
    pub fn dispatch_or(&self, subject: &S, default: R) -> R {
        self.dispatch(subject).unwrap_or(default)
    }
}

impl<S: ?Sized, R> fmt::Debug for Matcher<S, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Matcher")
            .field("cases", &self.cases.len())
            .finish()
    }
}

// =============================================================================
// Predicate helpers
// =============================================================================

/// Accepts subjects equal to `expected`.
pub fn equals<S, V>(expected: V) -> impl Fn(&S) -> bool
where
    S: PartialEq<V> + ?Sized,
{
    move |subject| *subject == expected
}

/// Accepts subjects within `minimum..=maximum`.
pub fn in_range<S, V>(minimum: V, maximum: V) -> impl Fn(&S) -> bool
where
    S: PartialOrd<V> + ?Sized,
{
    move |subject| *subject >= minimum && *subject <= maximum
}

/// Accepts every subject.
pub fn any<S: ?Sized>() -> impl Fn(&S) -> bool {
    |_| true
}

/// Negates `predicate`.
pub fn not<S, P>(predicate: P) -> impl Fn(&S) -> bool
where
    S: ?Sized,
    P: Fn(&S) -> bool,
{
    move |subject| !predicate(subject)
}
