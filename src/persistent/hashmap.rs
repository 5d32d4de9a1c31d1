//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`PersistentHashMap`], an immutable hash map
//! that uses structural sharing for efficient updates.
//!
//! # Overview
//!
//! `PersistentHashMap` is a Hash Array Mapped Trie (HAMT). It provides:
//!
//! - O(log32 N) `get`, `set` and `remove` (effectively O(1) for practical sizes)
//! - O(1) `len` and `is_empty`
//!
//! Each level of the trie consumes 5 bits of the 64-bit key hash. Branch
//! nodes store a 32-bit occupancy bitmap and a compressed child array, so a
//! branch with three children allocates three slots rather than 32. Keys
//! whose full hashes are identical share a collision node holding a small
//! list of entries.
//!
//! # Iteration Order
//!
//! Iteration follows the trie layout, which depends on the key hashes. It is
//! deterministic for a given set of keys within one process but is otherwise
//! unordered.
//!
//! # Examples
//!
//! ```rust
//! use graham::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .set("one".to_string(), 1)
//!     .set("two".to_string(), 2);
//!
//! assert_eq!(map.get("one"), Ok(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.set("one".to_string(), 100);
//! assert_eq!(map.get("one"), Ok(&1));
//! assert_eq!(updated.get("one"), Ok(&100));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;

use super::ReferenceCounter;
use super::node::{MAX_HASH_DEPTH, hash_fragment, hash_key};
use crate::error::KeyAbsent;
use crate::typeclass::{Foldable, TypeConstructor};

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node of the HAMT.
///
/// The root is always a `Bitmap`. Below the root, a `Bitmap` never holds
/// zero children or a single inline entry; removal collapses such nodes
/// into their parent.
#[derive(Clone)]
enum Node<K, V> {
    /// Bitmap-indexed branch
    Bitmap {
        /// Bit `i` is set when slot `i` is occupied
        bitmap: u32,
        /// Occupied slots in slot order
        children: ReferenceCounter<[Child<K, V>]>,
    },
    /// Keys sharing one full 64-bit hash
    Collision {
        hash: u64,
        entries: ReferenceCounter<[(K, V)]>,
    },
}

/// A slot of a bitmap node.
#[derive(Clone)]
enum Child<K, V> {
    /// Inline entry; the hash is cached to avoid rehashing on split
    Entry { hash: u64, key: K, value: V },
    /// Sub-trie one level deeper
    Node(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Node<K, V> {
    fn empty() -> Self {
        Self::Bitmap {
            bitmap: 0,
            children: ReferenceCounter::from(Vec::new()),
        }
    }
}

/// Position of `bit` in the compressed child array.
#[inline]
const fn compressed_position(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

#[inline]
const fn slot_bit(hash: u64, depth: usize) -> u32 {
    1u32 << hash_fragment(hash, depth)
}

// =============================================================================
// PersistentHashMap Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log32 N)        |
/// | `set`          | O(log32 N)        |
/// | `remove`       | O(log32 N)        |
/// | `contains_key` | O(log32 N)        |
/// | `merge`        | O(M log32 (N+M))  |
/// | `len`          | O(1)              |
///
/// # Examples
///
/// ```rust
/// use graham::persistent::PersistentHashMap;
///
/// let map = PersistentHashMap::singleton("key".to_string(), 42);
/// assert_eq!(map.get("key"), Ok(&42));
/// ```
pub struct PersistentHashMap<K, V> {
    /// Root node of the trie
    root: ReferenceCounter<Node<K, V>>,
    /// Number of entries
    length: usize,
}

impl<K, V> Clone for PersistentHashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
        }
    }
}

impl<K, V> PersistentHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ReferenceCounter::new(Node::empty()),
            length: 0,
        }
    }

    /// Alias of [`PersistentHashMap::new`].
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over key-value pairs in trie order.
    #[must_use]
    pub fn iter(&self) -> PersistentHashMapIterator<'_, K, V> {
        PersistentHashMapIterator {
            stack: vec![Frame::of(&self.root)],
            remaining: self.length,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Hash + Eq, V> PersistentHashMap<K, V> {
    /// Returns a reference to the value bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyAbsent`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::error::KeyAbsent;
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton("a", 1);
    /// assert_eq!(map.get(&"a"), Ok(&1));
    /// assert_eq!(map.get(&"b"), Err(KeyAbsent));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<&V, KeyAbsent>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        find(&self.root, key, hash_key(key)).ok_or(KeyAbsent)
    }

    /// Returns the value bound to `key`, or `default` if there is none.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if the map has an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_ok()
    }
}

/// Walks from `node` towards the entry for `key`.
fn find<'a, K, V, Q>(mut node: &'a Node<K, V>, key: &Q, hash: u64) -> Option<&'a V>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    let mut depth = 0;
    loop {
        match node {
            Node::Bitmap { bitmap, children } => {
                let bit = slot_bit(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                match &children[compressed_position(*bitmap, bit)] {
                    Child::Entry {
                        hash: entry_hash,
                        key: entry_key,
                        value,
                    } => {
                        return (*entry_hash == hash && entry_key.borrow() == key).then_some(value);
                    }
                    Child::Node(subnode) => {
                        node = subnode;
                        depth += 1;
                    }
                }
            }
            Node::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash != hash {
                    return None;
                }
                return entries
                    .iter()
                    .find(|(entry_key, _)| entry_key.borrow() == key)
                    .map(|(_, value)| value);
            }
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> PersistentHashMap<K, V> {
    /// Builds a map from key-value pairs. Later duplicates win.
    #[must_use]
    pub fn of<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |map, (key, value)| map.set(key, value))
    }

    /// Creates a map containing a single entry.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().set(key, value)
    }

    /// Binds `key` to `value`, returning the new map.
    ///
    /// An existing binding for `key` is replaced.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().set("a", 1);
    /// let updated = map.set("a", 2).set("b", 3);
    ///
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(updated.len(), 2);
    /// assert_eq!(updated.get(&"a"), Ok(&2));
    /// ```
    #[must_use]
    pub fn set(&self, key: K, value: V) -> Self {
        let hash = hash_key(&key);
        let (root, added) = insert(&self.root, 0, hash, key, value);
        Self {
            root: ReferenceCounter::new(root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Removes the entry for `key`, returning the new map.
    ///
    /// Removing an absent key is not an error: the result equals `self` and
    /// shares its root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::of([("a", 1), ("b", 2)]);
    /// let removed = map.remove(&"a");
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(removed.len(), 1);
    /// assert!(!removed.contains_key(&"a"));
    /// assert_eq!(removed.remove(&"zzz"), removed);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match remove(&self.root, 0, hash_key(key), key) {
            Some(root) => Self {
                root: ReferenceCounter::new(root),
                length: self.length - 1,
            },
            None => self.clone(),
        }
    }

    /// Returns a map holding the entries of both maps. On a shared key the
    /// value from `other` wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let left = PersistentHashMap::of([("a", 1), ("b", 2)]);
    /// let right = PersistentHashMap::of([("b", 20), ("c", 30)]);
    /// let merged = left.merge(&right);
    ///
    /// assert_eq!(merged.len(), 3);
    /// assert_eq!(merged.get(&"b"), Ok(&20));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        other.iter().fold(self.clone(), |merged, (key, value)| {
            merged.set(key.clone(), value.clone())
        })
    }

    /// Keeps the entries accepted by `predicate`.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter()
            .filter(|(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Clone, V> PersistentHashMap<K, V> {
    /// Transforms every value, keeping the keys.
    ///
    /// The trie shape depends only on the keys, so the result is built node
    /// for node without rehashing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::of([("a", 1), ("b", 2)]);
    /// let doubled = map.map_values(|value| value * 2);
    /// assert_eq!(doubled.get(&"b"), Ok(&4));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut function: F) -> PersistentHashMap<K, W>
    where
        F: FnMut(&V) -> W,
    {
        PersistentHashMap {
            root: ReferenceCounter::new(map_node(&self.root, &mut function)),
            length: self.length,
        }
    }
}

// =============================================================================
// Trie Updates
// =============================================================================

/// Path-copy insertion. Returns the new node and whether an entry was added.
fn insert<K, V>(
    node: &ReferenceCounter<Node<K, V>>,
    depth: usize,
    hash: u64,
    key: K,
    value: V,
) -> (Node<K, V>, bool)
where
    K: Clone + Eq,
    V: Clone,
{
    match node.as_ref() {
        Node::Bitmap { bitmap, children } => {
            let bit = slot_bit(hash, depth);
            let position = compressed_position(*bitmap, bit);
            let mut copied = children.to_vec();

            if bitmap & bit == 0 {
                copied.insert(position, Child::Entry { hash, key, value });
                let node = Node::Bitmap {
                    bitmap: bitmap | bit,
                    children: ReferenceCounter::from(copied),
                };
                return (node, true);
            }

            let (child, added) = match &children[position] {
                Child::Entry {
                    hash: entry_hash,
                    key: entry_key,
                    ..
                } if *entry_hash == hash && *entry_key == key => {
                    (Child::Entry { hash, key, value }, false)
                }
                Child::Entry {
                    hash: entry_hash,
                    key: entry_key,
                    value: entry_value,
                } => {
                    let existing = (*entry_hash, entry_key.clone(), entry_value.clone());
                    let split = split_pair(depth + 1, existing, (hash, key, value));
                    (Child::Node(ReferenceCounter::new(split)), true)
                }
                Child::Node(subnode) => {
                    let (updated, added) = insert(subnode, depth + 1, hash, key, value);
                    (Child::Node(ReferenceCounter::new(updated)), added)
                }
            };
            copied[position] = child;
            let node = Node::Bitmap {
                bitmap: *bitmap,
                children: ReferenceCounter::from(copied),
            };
            (node, added)
        }
        Node::Collision {
            hash: collision_hash,
            entries,
        } if *collision_hash == hash => {
            let mut copied = entries.to_vec();
            let added = match copied.iter_mut().find(|(entry_key, _)| *entry_key == key) {
                Some(entry) => {
                    entry.1 = value;
                    false
                }
                None => {
                    copied.push((key, value));
                    true
                }
            };
            let node = Node::Collision {
                hash: *collision_hash,
                entries: ReferenceCounter::from(copied),
            };
            (node, added)
        }
        Node::Collision {
            hash: collision_hash,
            ..
        } => {
            // A different hash reached this collision node: push the node one
            // level down behind a bitmap and retry there.
            let wrapper = ReferenceCounter::new(Node::Bitmap {
                bitmap: slot_bit(*collision_hash, depth),
                children: ReferenceCounter::from(vec![Child::Node(node.clone())]),
            });
            insert(&wrapper, depth, hash, key, value)
        }
    }
}

/// Builds the smallest sub-trie at `depth` that holds two distinct keys.
fn split_pair<K, V>(depth: usize, first: (u64, K, V), second: (u64, K, V)) -> Node<K, V> {
    let first_hash = first.0;
    let second_hash = second.0;
    debug_assert!(depth < MAX_HASH_DEPTH || first_hash == second_hash);

    if first_hash == second_hash {
        tracing::debug!(hash = first_hash, depth, "hash map collision node created");
        return Node::Collision {
            hash: first_hash,
            entries: ReferenceCounter::from(vec![(first.1, first.2), (second.1, second.2)]),
        };
    }

    let first_bit = slot_bit(first_hash, depth);
    let second_bit = slot_bit(second_hash, depth);

    if first_bit == second_bit {
        let deeper = split_pair(depth + 1, first, second);
        return Node::Bitmap {
            bitmap: first_bit,
            children: ReferenceCounter::from(vec![Child::Node(ReferenceCounter::new(deeper))]),
        };
    }

    let into_child = |(hash, key, value): (u64, K, V)| Child::Entry { hash, key, value };
    let children = if first_bit < second_bit {
        vec![into_child(first), into_child(second)]
    } else {
        vec![into_child(second), into_child(first)]
    };
    Node::Bitmap {
        bitmap: first_bit | second_bit,
        children: ReferenceCounter::from(children),
    }
}

/// Path-copy removal. Returns `None` when `key` is absent.
fn remove<K, V, Q>(node: &Node<K, V>, depth: usize, hash: u64, key: &Q) -> Option<Node<K, V>>
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: Eq + ?Sized,
{
    match node {
        Node::Bitmap { bitmap, children } => {
            let bit = slot_bit(hash, depth);
            if bitmap & bit == 0 {
                return None;
            }
            let position = compressed_position(*bitmap, bit);

            let replacement = match &children[position] {
                Child::Entry {
                    hash: entry_hash,
                    key: entry_key,
                    ..
                } => {
                    if *entry_hash != hash || entry_key.borrow() != key {
                        return None;
                    }
                    None
                }
                Child::Node(subnode) => collapse(remove(subnode, depth + 1, hash, key)?),
            };

            let mut copied = children.to_vec();
            let mut bitmap = *bitmap;
            match replacement {
                Some(child) => copied[position] = child,
                None => {
                    copied.remove(position);
                    bitmap &= !bit;
                }
            }
            Some(Node::Bitmap {
                bitmap,
                children: ReferenceCounter::from(copied),
            })
        }
        Node::Collision {
            hash: collision_hash,
            entries,
        } => {
            if *collision_hash != hash {
                return None;
            }
            let position = entries
                .iter()
                .position(|(entry_key, _)| entry_key.borrow() == key)?;
            let mut remaining = entries.to_vec();
            remaining.remove(position);

            if remaining.len() > 1 {
                return Some(Node::Collision {
                    hash: *collision_hash,
                    entries: ReferenceCounter::from(remaining),
                });
            }
            tracing::debug!(hash = *collision_hash, depth, "hash map collision node collapsed");
            let (key, value) = remaining.pop()?;
            Some(Node::Bitmap {
                bitmap: slot_bit(*collision_hash, depth),
                children: ReferenceCounter::from(vec![Child::Entry {
                    hash: *collision_hash,
                    key,
                    value,
                }]),
            })
        }
    }
}

/// Turns a shrunken sub-trie into the slot its parent should hold.
///
/// Empty sub-tries vanish and single-entry sub-tries are inlined.
fn collapse<K: Clone, V: Clone>(node: Node<K, V>) -> Option<Child<K, V>> {
    match &node {
        Node::Bitmap { children, .. } if children.is_empty() => None,
        Node::Bitmap { children, .. }
            if children.len() == 1 && matches!(children[0], Child::Entry { .. }) =>
        {
            Some(children[0].clone())
        }
        _ => Some(Child::Node(ReferenceCounter::new(node))),
    }
}

fn map_node<K: Clone, V, W, F>(node: &Node<K, V>, function: &mut F) -> Node<K, W>
where
    F: FnMut(&V) -> W,
{
    match node {
        Node::Bitmap { bitmap, children } => {
            let mapped: Vec<Child<K, W>> = children
                .iter()
                .map(|child| match child {
                    Child::Entry { hash, key, value } => Child::Entry {
                        hash: *hash,
                        key: key.clone(),
                        value: function(value),
                    },
                    Child::Node(subnode) => {
                        Child::Node(ReferenceCounter::new(map_node(subnode, &mut *function)))
                    }
                })
                .collect();
            Node::Bitmap {
                bitmap: *bitmap,
                children: ReferenceCounter::from(mapped),
            }
        }
        Node::Collision { hash, entries } => {
            let mapped: Vec<(K, W)> = entries
                .iter()
                .map(|(key, value)| (key.clone(), function(value)))
                .collect();
            Node::Collision {
                hash: *hash,
                entries: ReferenceCounter::from(mapped),
            }
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// One partially visited node on the iteration stack.
enum Frame<'a, K, V> {
    Children(std::slice::Iter<'a, Child<K, V>>),
    Entries(std::slice::Iter<'a, (K, V)>),
}

impl<'a, K, V> Frame<'a, K, V> {
    fn of(node: &'a Node<K, V>) -> Self {
        match node {
            Node::Bitmap { children, .. } => Self::Children(children.iter()),
            Node::Collision { entries, .. } => Self::Entries(entries.iter()),
        }
    }
}

/// An iterator over entries of a [`PersistentHashMap`].
///
/// Walks the trie depth-first without materialising the entries.
pub struct PersistentHashMapIterator<'a, K, V> {
    stack: Vec<Frame<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for PersistentHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match self.stack.last_mut()? {
                Frame::Children(children) => match children.next() {
                    Some(Child::Entry { key, value, .. }) => Some((key, value)),
                    Some(Child::Node(subnode)) => {
                        self.stack.push(Frame::of(subnode));
                        continue;
                    }
                    None => None,
                },
                Frame::Entries(entries) => entries.next().map(|(key, value)| (key, value)),
            };
            match next {
                Some(entry) => {
                    self.remaining -= 1;
                    return Some(entry);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIterator<'_, K, V> {}

/// An owning iterator over entries of a [`PersistentHashMap`].
pub struct PersistentHashMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentHashMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        PersistentHashMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentHashMapIterator<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for PersistentHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if ReferenceCounter::ptr_eq(&self.root, &other.root) {
            return true;
        }
        self.length == other.length
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_ok_and(|found| found == value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for PersistentHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<K, V> TypeConstructor for PersistentHashMap<K, V> {
    type Inner = V;
    type WithType<B> = PersistentHashMap<K, B>;
}

/// Folds over the values in iteration order.
impl<K: Clone, V: Clone> Foldable for PersistentHashMap<K, V> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.values()
            .fold(init, |accumulator, value| function(accumulator, value.clone()))
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(V, B) -> B,
    {
        let values: Vec<&V> = self.values().collect();
        values
            .into_iter()
            .rev()
            .fold(init, |accumulator, value| function(value.clone(), accumulator))
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
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for PersistentHashMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.length))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentHashMapVisitor<K, V> {
    marker: std::marker::PhantomData<fn() -> PersistentHashMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentHashMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = PersistentHashMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.set(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentHashMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentHashMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::hash::Hasher;

    /// Key whose hash ignores the payload, forcing every key into one
    /// collision node.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CollidingKey(u32);

    impl Hash for CollidingKey {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0_u8.hash(state);
        }
    }

    fn root_is_collision_free<K, V>(map: &PersistentHashMap<K, V>) -> bool {
        fn walk<K, V>(node: &Node<K, V>) -> bool {
            match node {
                Node::Bitmap { children, .. } => children.iter().all(|child| match child {
                    Child::Entry { .. } => true,
                    Child::Node(subnode) => walk(subnode),
                }),
                Node::Collision { .. } => false,
            }
        }
        walk(&map.root)
    }

    #[rstest]
    fn test_new_creates_empty() {
        let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[rstest]
    fn test_set_and_get() {
        let map = PersistentHashMap::new().set("a", 1).set("b", 2);
        assert_eq!(map.get(&"a"), Ok(&1));
        assert_eq!(map.get(&"b"), Ok(&2));
        assert_eq!(map.get(&"c"), Err(KeyAbsent));
    }

    #[rstest]
    fn test_set_overwrite_keeps_length() {
        let map = PersistentHashMap::new().set("a", 1);
        let updated = map.set("a", 10);
        assert_eq!(updated.len(), 1);
        assert_eq!(updated.get(&"a"), Ok(&10));
        assert_eq!(map.get(&"a"), Ok(&1));
    }

    #[rstest]
    fn test_get_with_borrowed_key() {
        let map = PersistentHashMap::singleton("key".to_string(), 42);
        assert_eq!(map.get("key"), Ok(&42));
    }

    #[rstest]
    fn test_get_or() {
        let map = PersistentHashMap::singleton("a", 1);
        assert_eq!(map.get_or(&"a", &0), &1);
        assert_eq!(map.get_or(&"b", &0), &0);
    }

    #[rstest]
    #[case(10)]
    #[case(100)]
    #[case(5_000)]
    fn test_many_entries(#[case] size: i32) {
        let map: PersistentHashMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();
        assert_eq!(map.len(), size as usize);
        for key in 0..size {
            assert_eq!(map.get(&key), Ok(&(key * 2)));
        }
        assert_eq!(map.iter().count(), size as usize);
    }

    #[rstest]
    fn test_remove_every_entry() {
        let map: PersistentHashMap<i32, i32> = (0..500).map(|key| (key, key)).collect();
        let emptied = (0..500).fold(map.clone(), |current, key| {
            let next = current.remove(&key);
            assert!(!next.contains_key(&key));
            next
        });
        assert!(emptied.is_empty());
        assert_eq!(emptied, PersistentHashMap::new());
        assert_eq!(map.len(), 500);
    }

    #[rstest]
    fn test_remove_absent_key_shares_root() {
        let map = PersistentHashMap::of([("a", 1), ("b", 2)]);
        let same = map.remove(&"missing");
        assert!(ReferenceCounter::ptr_eq(&map.root, &same.root));
        assert_eq!(same.len(), 2);
    }

    #[rstest]
    fn test_set_shares_untouched_children() {
        let map: PersistentHashMap<i32, i32> = (0..2000).map(|key| (key, key)).collect();
        let updated = map.set(0, -1);

        let (Node::Bitmap { children: before, .. }, Node::Bitmap { children: after, .. }) =
            (map.root.as_ref(), updated.root.as_ref())
        else {
            panic!("root must be a bitmap");
        };
        let shared = before
            .iter()
            .zip(after.iter())
            .filter(|(left, right)| match (left, right) {
                (Child::Node(left), Child::Node(right)) => ReferenceCounter::ptr_eq(left, right),
                _ => false,
            })
            .count();
        assert!(shared >= before.len() - 1);
    }

    #[rstest]
    fn test_colliding_keys() {
        let map = PersistentHashMap::new()
            .set(CollidingKey(1), "one")
            .set(CollidingKey(2), "two")
            .set(CollidingKey(3), "three");

        assert_eq!(map.len(), 3);
        assert!(!root_is_collision_free(&map));
        assert_eq!(map.get(&CollidingKey(2)), Ok(&"two"));

        let overwritten = map.set(CollidingKey(2), "TWO");
        assert_eq!(overwritten.len(), 3);
        assert_eq!(overwritten.get(&CollidingKey(2)), Ok(&"TWO"));
    }

    #[rstest]
    fn test_collision_collapses_to_entry() {
        let map = PersistentHashMap::new()
            .set(CollidingKey(1), 1)
            .set(CollidingKey(2), 2);
        let removed = map.remove(&CollidingKey(1));

        assert_eq!(removed.len(), 1);
        assert!(root_is_collision_free(&removed));
        assert_eq!(removed.get(&CollidingKey(2)), Ok(&2));
        assert_eq!(removed.remove(&CollidingKey(2)), PersistentHashMap::new());
    }

    #[rstest]
    fn test_remove_from_collision_below_last_hash_level() {
        // Both hashes agree on their low 60 bits, so the entries only part at
        // the last level and the collision node sits one level deeper.
        const SHARED: u64 = 0x0123_4567_89AB_CDEF;
        const SIBLING: u64 = SHARED | 0xF000_0000_0000_0000;

        let empty = ReferenceCounter::new(Node::<&str, i32>::empty());
        let (root, _) = insert(&empty, 0, SHARED, "a", 1);
        let (root, _) = insert(&ReferenceCounter::new(root), 0, SIBLING, "b", 2);
        let (root, added) = insert(&ReferenceCounter::new(root), 0, SHARED, "c", 3);
        assert!(added);
        assert_eq!(find(&root, &"c", SHARED), Some(&3));

        let removed = remove(&root, 0, SHARED, &"c").expect("key is present");
        assert_eq!(find(&removed, &"c", SHARED), None);
        assert_eq!(find(&removed, &"a", SHARED), Some(&1));
        assert_eq!(find(&removed, &"b", SIBLING), Some(&2));

        let emptied = remove(&removed, 0, SHARED, &"a").expect("key is present");
        assert_eq!(find(&emptied, &"b", SIBLING), Some(&2));
        assert_eq!(find(&emptied, &"a", SHARED), None);
    }

    #[rstest]
    fn test_merge_is_right_biased() {
        let left = PersistentHashMap::of([("a", 1), ("b", 2)]);
        let right = PersistentHashMap::of([("b", 3)]);
        let merged = left.merge(&right);
        assert_eq!(merged, PersistentHashMap::of([("a", 1), ("b", 3)]));
    }

    #[rstest]
    fn test_map_values_and_filter() {
        let map: PersistentHashMap<i32, i32> = (0..50).map(|key| (key, key)).collect();
        let squared = map.map_values(|value| value * value);
        assert_eq!(squared.get(&7), Ok(&49));
        assert_eq!(squared.len(), 50);

        let even = map.filter(|key, _| key % 2 == 0);
        assert_eq!(even.len(), 25);
        assert!(even.keys().all(|key| key % 2 == 0));
    }

    #[rstest]
    fn test_eq_ignores_insertion_order() {
        let forward: PersistentHashMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
        let backward: PersistentHashMap<i32, i32> = (0..100).rev().map(|key| (key, key)).collect();
        assert_eq!(forward, backward);
        assert_ne!(forward, backward.set(0, 1));
    }

    #[rstest]
    fn test_fold_left_sums_values() {
        let map = PersistentHashMap::of([("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(map.fold_left(0, |sum, value| sum + value), 6);
    }
}

#[cfg(all(test, feature = "arc"))]
mod send_sync_tests {
    use super::PersistentHashMap;

    static_assertions::assert_impl_all!(PersistentHashMap<String, i32>: Send, Sync);
}
