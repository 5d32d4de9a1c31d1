//! Persistent (immutable) vector based on a 32-way radix trie.
//!
//! This module provides [`PersistentVector`], an immutable ordered sequence
//! that uses structural sharing for efficient updates.
//!
//! # Overview
//!
//! The layout follows Clojure's `PersistentVector`:
//!
//! - O(log32 N) random access (effectively O(1) for practical sizes)
//! - O(log32 N) `set` through path copying
//! - amortised O(1) `push` and `pop` thanks to the tail buffer
//! - O(1) `len` and `is_empty`
//!
//! All operations return new vectors without modifying the original. The
//! new version shares every trie node that is not on the updated path.
//!
//! # Internal Structure
//!
//! The vector consists of:
//! - A root node (32-way branching trie, see [`super::node`])
//! - A tail buffer (up to 32 elements) holding the most recent appends
//!
//! # Examples
//!
//! ```rust
//! use graham::persistent::PersistentVector;
//!
//! let vector = PersistentVector::new().push(1).push(2).push(3);
//!
//! assert_eq!(vector.get(0), Ok(&1));
//! assert_eq!(vector.get(2), Ok(&3));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.push(4);
//! assert_eq!(vector.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Add;

use super::ReferenceCounter;
use super::node::{self, BITS_PER_LEVEL, BRANCHING_FACTOR, Node};
use crate::error::{EmptyError, IndexError};
use crate::typeclass::{Foldable, Functor, TypeConstructor};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector.
///
/// # Time Complexity
///
/// | Operation  | Complexity                      |
/// |------------|---------------------------------|
/// | `new`      | O(1)                            |
/// | `of`       | O(N)                            |
/// | `get`      | O(log32 N)                      |
/// | `set`      | O(log32 N)                      |
/// | `push`     | O(log32 N), amortised O(1)      |
/// | `pop`      | O(log32 N), amortised O(1)      |
/// | `prepend`  | O(N)                            |
/// | `reverse`  | O(N)                            |
/// | `len`      | O(1)                            |
/// | `iter`     | O(1) to create, O(N) to iterate |
///
/// # Examples
///
/// ```rust
/// use graham::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Ok(&50));
/// ```
pub struct PersistentVector<T> {
    /// Total number of elements
    length: usize,
    /// Level of the root node: (depth - 1) * `BITS_PER_LEVEL`
    shift: usize,
    /// Root node of the trie
    root: ReferenceCounter<Node<T>>,
    /// Tail buffer for efficient append (up to 32 elements)
    tail: ReferenceCounter<[T]>,
}

impl<T> Clone for PersistentVector<T> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            shift: self.shift,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T> PersistentVector<T> {
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(node::empty_branch()),
            tail: ReferenceCounter::from(Vec::new()),
        }
    }

    /// Alias of [`PersistentVector::new`].
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new()
    }

    /// Builds a vector from a finite ordered sequence.
    ///
    /// # Complexity
    ///
    /// O(N): the trie is packed bottom-up in a single pass.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::of(["a", "b", "c"]);
    /// assert_eq!(vector.get(1), Ok(&"b"));
    /// ```
    #[must_use]
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        build_from_vec(items.into_iter().collect())
    }

    /// Creates a vector containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self {
            length: 1,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(node::empty_branch()),
            tail: ReferenceCounter::from(vec![element]),
        }
    }

    /// Returns the number of elements in the vector.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the index of the first element held in the tail buffer.
    #[inline]
    const fn tail_offset(&self) -> usize {
        if self.length < BRANCHING_FACTOR {
            0
        } else {
            ((self.length - 1) >> BITS_PER_LEVEL) << BITS_PER_LEVEL
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] when `index >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::error::IndexError;
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Ok(&1));
    /// assert_eq!(vector.get(10), Err(IndexError { index: 10, length: 5 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, IndexError> {
        let out_of_range = IndexError {
            index,
            length: self.length,
        };
        if index >= self.length {
            return Err(out_of_range);
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.get(index - tail_offset).ok_or(out_of_range)
        } else {
            node::lookup(&self.root, self.shift, index).ok_or(out_of_range)
        }
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0).ok()
    }

    /// Returns a reference to the last element, or `None` if empty.
    ///
    /// # Complexity
    ///
    /// O(1) - the last element is always in the tail
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.last()
    }

    /// Returns an iterator over references to the elements, front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator {
            vector: self,
            index: 0,
            leaf: &[],
        }
    }

    /// Returns the storage chunk (trie leaf or tail) holding `index`.
    fn chunk_for(&self, index: usize) -> &[T] {
        if index >= self.tail_offset() {
            &self.tail
        } else {
            node::leaf_at(&self.root, self.shift, index).map_or(&[] as &[T], |leaf| &**leaf)
        }
    }

    /// Applies `function` to every element, producing a new vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::of([1, 2, 3]);
    /// assert_eq!(vector.map(|x| x * 10), PersistentVector::of([10, 20, 30]));
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> PersistentVector<U>
    where
        F: FnMut(&T) -> U,
    {
        self.iter().map(function).collect()
    }

    /// Folds every element into an accumulator, front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::of([1, 2, 3, 4]);
    /// assert_eq!(vector.reduce(0, |sum, x| sum + x), 10);
    /// ```
    pub fn reduce<U, F>(&self, init: U, function: F) -> U
    where
        F: FnMut(U, &T) -> U,
    {
        self.iter().fold(init, function)
    }

    /// Finds the index of the first element that satisfies the predicate.
    #[must_use]
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(predicate)
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Creates a vector from a slice, cloning its elements.
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        build_from_vec(slice.to_vec())
    }

    /// Appends an element, returning the new vector.
    ///
    /// # Complexity
    ///
    /// O(log32 N), amortised O(1) due to the tail buffer
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::new().push(1).push(2);
    /// assert_eq!(vector.len(), 2);
    /// assert_eq!(vector.get(1), Ok(&2));
    /// ```
    #[must_use]
    pub fn push(&self, element: T) -> Self {
        if self.tail.len() < BRANCHING_FACTOR {
            let mut tail = Vec::with_capacity(self.tail.len() + 1);
            tail.extend_from_slice(&self.tail);
            tail.push(element);

            Self {
                length: self.length + 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::from(tail),
            }
        } else {
            self.push_tail_into_root(element)
        }
    }

    /// Moves the full tail into the trie and starts a new tail with `element`.
    fn push_tail_into_root(&self, element: T) -> Self {
        // The leaf reuses the tail allocation; only the reference count changes.
        let tail_leaf = node::share_leaf(self.tail.clone());
        let tail_offset = self.tail_offset();
        let root_overflow = (tail_offset >> self.shift) >= BRANCHING_FACTOR;

        let (root, shift) = if root_overflow {
            let shift = self.shift + BITS_PER_LEVEL;
            tracing::trace!(shift, length = self.length + 1, "vector trie grew a level");
            let root = node::make_branch([
                self.root.clone(),
                ReferenceCounter::new(node::new_path(self.shift, tail_leaf)),
            ]);
            (root, shift)
        } else {
            let root = node::push_leaf(&self.root, self.shift, tail_offset, tail_leaf);
            (root, self.shift)
        };

        Self {
            length: self.length + 1,
            shift,
            root: ReferenceCounter::new(root),
            tail: ReferenceCounter::from(vec![element]),
        }
    }

    /// Removes the last element, returning the new vector.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyError`] if the vector is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::error::EmptyError;
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::of([1, 2, 3]);
    /// assert_eq!(vector.pop(), Ok(PersistentVector::of([1, 2])));
    /// assert_eq!(PersistentVector::<i32>::new().pop(), Err(EmptyError));
    /// ```
    pub fn pop(&self) -> Result<Self, EmptyError> {
        match self.length {
            0 => Err(EmptyError),
            1 => Ok(Self::new()),
            _ if self.tail.len() > 1 => Ok(Self {
                length: self.length - 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::from(self.tail[..self.tail.len() - 1].to_vec()),
            }),
            _ => Ok(self.pop_tail_from_root()),
        }
    }

    /// Promotes the right-most trie leaf to be the new tail.
    fn pop_tail_from_root(&self) -> Self {
        let last_index = self.length - 2;
        let tail = node::leaf_at(&self.root, self.shift, last_index)
            .cloned()
            .unwrap_or_else(|| ReferenceCounter::from(Vec::new()));

        let mut root = node::pop_leaf(&self.root, self.shift, last_index)
            .map_or_else(|| ReferenceCounter::new(node::empty_branch()), ReferenceCounter::new);
        let mut shift = self.shift;

        if shift > BITS_PER_LEVEL
            && let Node::Branch(children) = root.as_ref()
            && children[1].is_none()
            && let Some(only_child) = children[0].clone()
        {
            root = only_child;
            shift -= BITS_PER_LEVEL;
            tracing::trace!(shift, length = self.length - 1, "vector trie dropped a level");
        }

        Self {
            length: self.length - 1,
            shift,
            root,
            tail,
        }
    }

    /// Replaces the element at `index`, returning the new vector.
    ///
    /// Only the nodes on the path to `index` are copied; every other subtree
    /// is shared with `self`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] when `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let updated = vector.set(2, 100).unwrap();
    ///
    /// assert_eq!(updated.get(2), Ok(&100));
    /// assert_eq!(vector.get(2), Ok(&3)); // Original unchanged
    /// ```
    pub fn set(&self, index: usize, element: T) -> Result<Self, IndexError> {
        if index >= self.length {
            return Err(IndexError {
                index,
                length: self.length,
            });
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            let mut tail = self.tail.to_vec();
            tail[index - tail_offset] = element;
            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::from(tail),
            })
        } else {
            let root = node::assoc(&self.root, self.shift, index, element);
            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: ReferenceCounter::new(root),
                tail: self.tail.clone(),
            })
        }
    }

    /// Keeps the elements satisfying `predicate`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=6).collect();
    /// assert_eq!(vector.filter(|x| x % 2 == 0), PersistentVector::of([2, 4, 6]));
    /// ```
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .filter(|element| predicate(element))
            .cloned()
            .collect()
    }

    /// Returns the elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut elements: Vec<T> = self.iter().cloned().collect();
        elements.reverse();
        build_from_vec(elements)
    }

    /// Prepends an element.
    ///
    /// # Complexity
    ///
    /// O(N) - every element shifts by one slot, so the trie is rebuilt
    #[must_use]
    pub fn prepend(&self, element: T) -> Self {
        std::iter::once(element)
            .chain(self.iter().cloned())
            .collect()
    }

    /// Returns this vector followed by every element of `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentVector;
    ///
    /// let left = PersistentVector::of([1, 2]);
    /// let right = PersistentVector::of([3]);
    /// assert_eq!(left.concat(&right), PersistentVector::of([1, 2, 3]));
    /// assert_eq!(left.clone() + right, PersistentVector::of([1, 2, 3]));
    /// ```
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        other
            .iter()
            .fold(self.clone(), |result, element| result.push(element.clone()))
    }

    /// Returns the first `count` elements (all of them if `count` exceeds the length).
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        if count >= self.length {
            return self.clone();
        }
        self.iter().take(count).cloned().collect()
    }

    /// Returns the vector without its first `count` elements.
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        self.iter().skip(count).cloned().collect()
    }

    /// Returns the vector without its first element (empty stays empty).
    #[must_use]
    pub fn rest(&self) -> Self {
        self.skip(1)
    }

    /// Returns a sorted copy.
    #[must_use]
    pub fn sort(&self) -> Self
    where
        T: Ord,
    {
        let mut elements: Vec<T> = self.iter().cloned().collect();
        elements.sort();
        build_from_vec(elements)
    }

    /// Returns a copy sorted by the key extracted with `key`.
    ///
    /// The sort is stable.
    #[must_use]
    pub fn sort_by_key<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let mut elements: Vec<T> = self.iter().cloned().collect();
        elements.sort_by_key(key);
        build_from_vec(elements)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentVector`].
///
/// Caches the current 32-element chunk, so the trie is descended once per
/// chunk rather than once per element.
pub struct PersistentVectorIterator<'a, T> {
    vector: &'a PersistentVector<T>,
    /// Index of the next element to yield
    index: usize,
    /// Remaining elements of the cached chunk
    leaf: &'a [T],
}

impl<'a, T> Iterator for PersistentVectorIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.length {
            return None;
        }
        if self.leaf.is_empty() {
            let chunk = self.vector.chunk_for(self.index);
            let start = if self.index >= self.vector.tail_offset() {
                self.index - self.vector.tail_offset()
            } else {
                self.index & node::MASK
            };
            self.leaf = chunk.get(start..).unwrap_or(&[]);
        }
        let (element, remaining) = self.leaf.split_first()?;
        self.leaf = remaining;
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.length - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for PersistentVectorIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentVector`].
///
/// Elements are cloned out of the shared storage, which may still be
/// referenced by other vector versions.
pub struct PersistentVectorIntoIterator<T> {
    vector: PersistentVector<T>,
    index: usize,
}

impl<T: Clone> Iterator for PersistentVectorIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.vector.get(self.index).ok()?.clone();
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.length.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentVectorIntoIterator<T> {}

// =============================================================================
// Construction Helpers
// =============================================================================

/// Packs `elements` into a trie plus tail without cloning.
fn build_from_vec<T>(mut elements: Vec<T>) -> PersistentVector<T> {
    let length = elements.len();
    if length <= BRANCHING_FACTOR {
        return PersistentVector {
            length,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(node::empty_branch()),
            tail: ReferenceCounter::from(elements),
        };
    }

    let tail_size = match length % BRANCHING_FACTOR {
        0 => BRANCHING_FACTOR,
        remainder => remainder,
    };
    let tail = elements.split_off(length - tail_size);
    let (root, shift) = node::build_root(elements);

    PersistentVector {
        length,
        shift,
        root,
        tail: ReferenceCounter::from(tail),
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<T: Clone> IntoIterator for PersistentVector<T> {
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator {
            vector: self,
            index: 0,
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> Add for PersistentVector<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.concat(&other)
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

/// Hashes the length followed by every element in order, so equal vectors
/// hash equally regardless of how their tries were built.
impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (position, element) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for PersistentVector<T> {
    type Inner = T;
    type WithType<B> = PersistentVector<B>;
}

impl<T: Clone> Functor for PersistentVector<T> {
    fn fmap<B, F>(self, function: F) -> PersistentVector<B>
    where
        F: FnMut(T) -> B,
    {
        self.into_iter().map(function).collect()
    }
}

impl<T: Clone> Foldable for PersistentVector<T> {
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, T) -> B,
    {
        self.into_iter().fold(init, function)
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> B,
    {
        let elements: Vec<T> = self.into_iter().collect();
        elements
            .into_iter()
            .rev()
            .fold(init, |accumulator, element| function(element, accumulator))
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut sequence = serializer.serialize_seq(Some(self.length))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(build_from_vec)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty() {
        let vector: PersistentVector<i32> = PersistentVector::new();
        assert!(vector.is_empty());
        assert_eq!(vector.len(), 0);
        assert_eq!(vector.first(), None);
        assert_eq!(vector.last(), None);
    }

    #[rstest]
    fn test_singleton() {
        let vector = PersistentVector::singleton(42);
        assert_eq!(vector.len(), 1);
        assert_eq!(vector.get(0), Ok(&42));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(31)]
    #[case(32)]
    #[case(33)]
    #[case(1024)]
    #[case(1056)]
    #[case(1057)]
    #[case(40_000)]
    fn test_of_and_push_agree(#[case] size: usize) {
        let built = PersistentVector::of(0..size);
        let pushed = (0..size).fold(PersistentVector::new(), |vector, element| {
            vector.push(element)
        });

        assert_eq!(built.len(), size);
        assert_eq!(built, pushed);
        for index in [0, size / 2, size.saturating_sub(1)] {
            if index < size {
                assert_eq!(built.get(index), Ok(&index));
                assert_eq!(pushed.get(index), Ok(&index));
            }
        }
    }

    #[rstest]
    fn test_get_out_of_range() {
        let vector: PersistentVector<i32> = (0..40).collect();
        assert_eq!(
            vector.get(40),
            Err(IndexError {
                index: 40,
                length: 40
            })
        );
    }

    #[rstest]
    fn test_set_in_trie_and_tail() {
        let vector: PersistentVector<usize> = (0..100).collect();
        let updated = vector.set(5, 500).unwrap().set(99, 9900).unwrap();

        assert_eq!(updated.get(5), Ok(&500));
        assert_eq!(updated.get(99), Ok(&9900));
        assert_eq!(vector.get(5), Ok(&5));
        assert_eq!(vector.get(99), Ok(&99));
    }

    #[rstest]
    fn test_set_shares_untouched_subtrees() {
        let vector: PersistentVector<usize> = (0..2000).collect();
        let updated = vector.set(0, 7).unwrap();

        assert!(ReferenceCounter::ptr_eq(&vector.tail, &updated.tail));
        match (vector.root.as_ref(), updated.root.as_ref()) {
            (Node::Branch(before), Node::Branch(after)) => {
                let before = before[1].as_ref().unwrap();
                let after = after[1].as_ref().unwrap();
                assert!(ReferenceCounter::ptr_eq(before, after));
            }
            _ => panic!("root must be a branch"),
        }
    }

    #[rstest]
    fn test_push_shares_root_while_tail_has_room() {
        let vector: PersistentVector<i32> = (0..40).collect();
        let pushed = vector.push(40);
        assert!(ReferenceCounter::ptr_eq(&vector.root, &pushed.root));
    }

    #[rstest]
    fn test_pop_across_tail_boundary() {
        let vector: PersistentVector<usize> = (0..33).collect();
        let popped = vector.pop().unwrap();
        assert_eq!(popped.len(), 32);
        assert_eq!(popped.last(), Some(&31));
        assert_eq!(popped, PersistentVector::of(0..32));
    }

    #[rstest]
    fn test_pop_shrinks_depth() {
        let size = BRANCHING_FACTOR * BRANCHING_FACTOR + BRANCHING_FACTOR + 1;
        let vector: PersistentVector<usize> = (0..size).collect();
        assert_eq!(vector.shift, 2 * BITS_PER_LEVEL);

        let popped = vector.pop().unwrap();
        assert_eq!(popped.shift, BITS_PER_LEVEL);
        assert_eq!(popped, PersistentVector::of(0..size - 1));
    }

    #[rstest]
    fn test_pop_all_the_way_down() {
        let mut vector: PersistentVector<usize> = (0..1100).collect();
        for expected_length in (0..1100).rev() {
            vector = vector.pop().unwrap();
            assert_eq!(vector.len(), expected_length);
            if expected_length > 0 {
                assert_eq!(vector.last(), Some(&(expected_length - 1)));
            }
        }
        assert_eq!(vector.pop(), Err(EmptyError));
    }

    #[rstest]
    fn test_iter_matches_get() {
        let vector: PersistentVector<usize> = (0..1500).collect();
        let collected: Vec<usize> = vector.iter().copied().collect();
        assert_eq!(collected, (0..1500).collect::<Vec<_>>());
        assert_eq!(vector.iter().len(), 1500);
    }

    #[rstest]
    fn test_map_filter_reduce() {
        let vector: PersistentVector<i32> = (1..=10).collect();
        assert_eq!(vector.map(|x| x * 2).get(9), Ok(&20));
        assert_eq!(vector.filter(|x| x % 3 == 0), PersistentVector::of([3, 6, 9]));
        assert_eq!(vector.reduce(0, |sum, x| sum + x), 55);
    }

    #[rstest]
    fn test_reverse_leaves_source_untouched() {
        let vector: PersistentVector<i32> = (1..=5).collect();
        let reversed = vector.reverse();
        assert_eq!(reversed, PersistentVector::of([5, 4, 3, 2, 1]));
        assert_eq!(vector, PersistentVector::of([1, 2, 3, 4, 5]));
    }

    #[rstest]
    fn test_take_skip_rest() {
        let vector: PersistentVector<i32> = (1..=5).collect();
        assert_eq!(vector.take(2), PersistentVector::of([1, 2]));
        assert_eq!(vector.take(10), vector);
        assert_eq!(vector.skip(3), PersistentVector::of([4, 5]));
        assert_eq!(vector.rest(), PersistentVector::of([2, 3, 4, 5]));
        assert!(PersistentVector::<i32>::new().rest().is_empty());
    }

    #[rstest]
    fn test_sort_and_sort_by_key() {
        let vector = PersistentVector::of([3, 1, 2]);
        assert_eq!(vector.sort(), PersistentVector::of([1, 2, 3]));

        let words = PersistentVector::of(["ccc", "a", "bb"]);
        assert_eq!(
            words.sort_by_key(|word| word.len()),
            PersistentVector::of(["a", "bb", "ccc"])
        );
    }

    #[rstest]
    fn test_prepend_and_concat() {
        let vector = PersistentVector::of([2, 3]);
        assert_eq!(vector.prepend(1), PersistentVector::of([1, 2, 3]));
        assert_eq!(
            vector.concat(&PersistentVector::of([4])),
            PersistentVector::of([2, 3, 4])
        );
    }

    #[rstest]
    fn test_display() {
        let empty: PersistentVector<i32> = PersistentVector::new();
        assert_eq!(format!("{empty}"), "[]");
        assert_eq!(format!("{}", PersistentVector::of([1, 2, 3])), "[1, 2, 3]");
    }

    #[rstest]
    fn test_fold_right_order() {
        let vector = PersistentVector::of(["a", "b", "c"]);
        let joined = vector.fold_right(String::new(), |element, accumulator| {
            format!("{accumulator}{element}")
        });
        assert_eq!(joined, "cba");
    }

    #[rstest]
    fn test_fmap() {
        let vector = PersistentVector::of([1, 2, 3]);
        assert_eq!(
            vector.fmap(|x| x.to_string()),
            PersistentVector::of(["1".to_string(), "2".to_string(), "3".to_string()])
        );
    }
}


#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn test_vector_shared_across_threads() {
        let vector: PersistentVector<usize> = (0..1000).collect();

        let handles: Vec<_> = (0..4)
            .map(|thread_index| {
                let base = vector.clone();
                thread::spawn(move || {
                    let derived = base.set(thread_index, 0).unwrap().push(thread_index);
                    (base.reduce(0, |sum, x| sum + x), derived.len())
                })
            })
            .collect();

        for handle in handles {
            let (sum, length) = handle.join().unwrap();
            assert_eq!(sum, 499_500);
            assert_eq!(length, 1001);
        }
        assert_eq!(vector.get(0), Ok(&0));
    }
}
