//! Structural node store shared by the persistent containers.
//!
//! Nodes are immutable once built and are always held through
//! [`ReferenceCounter`], so any number of container versions can point at
//! the same subtree. Updates never touch an existing node: they rebuild the
//! nodes on the path from the root to the changed slot ("path copy") and
//! reuse every other subtree by bumping its reference count.
//!
//! The vector trie lives here in full. The hash map keeps its own node
//! shape (bitmap-indexed branches and collision lists) but takes the trie
//! geometry and the key hash from this module.

use std::hash::{Hash, Hasher};

use super::ReferenceCounter;

// =============================================================================
// Trie Geometry
// =============================================================================

/// Branching factor (2^5 = 32)
pub(crate) const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting the slot within a node
pub(crate) const MASK: usize = BRANCHING_FACTOR - 1;

// =============================================================================
// Key Hashing
// =============================================================================

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyHasher = ahash::AHasher;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyHasher = std::collections::hash_map::DefaultHasher;

/// Hashes a key with fixed-key hasher state.
///
/// The result depends only on the key, so it is stable for the lifetime of
/// the process regardless of which map version performs the lookup.
#[inline]
pub(crate) fn hash_key<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = KeyHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Extracts the 5-bit slot for `depth` from a key hash.
///
/// Depths past the last hash bit map to slot 0.
#[inline]
pub(crate) const fn hash_fragment(hash: u64, depth: usize) -> usize {
    if depth >= MAX_HASH_DEPTH {
        return 0;
    }
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK as u64) as usize
}

/// Number of trie levels a 64-bit hash can address.
pub(crate) const MAX_HASH_DEPTH: usize = 64usize.div_ceil(BITS_PER_LEVEL);

// =============================================================================
// Vector Trie Nodes
// =============================================================================

/// Fixed-width child table of a branch node.
pub(crate) type Children<T> = [Option<ReferenceCounter<Node<T>>>; BRANCHING_FACTOR];

/// A node of the vector trie.
///
/// A branch at level `L` routes index `i` to child `(i >> L) & MASK`;
/// leaves sit at level 0 and hold up to [`BRANCHING_FACTOR`] elements.
pub(crate) enum Node<T> {
    /// Interior node
    Branch(Children<T>),
    /// Element storage, shareable with a vector's tail buffer
    Leaf(ReferenceCounter<[T]>),
}

/// Builds a leaf holding `values`.
pub(crate) fn make_leaf<T>(values: Vec<T>) -> Node<T> {
    debug_assert!(values.len() <= BRANCHING_FACTOR);
    Node::Leaf(ReferenceCounter::from(values))
}

/// Wraps already shared element storage in a leaf without copying it.
pub(crate) const fn share_leaf<T>(values: ReferenceCounter<[T]>) -> Node<T> {
    Node::Leaf(values)
}

/// Builds a branch whose first slots are filled with `children`.
pub(crate) fn make_branch<T, I>(children: I) -> Node<T>
where
    I: IntoIterator<Item = ReferenceCounter<Node<T>>>,
{
    let mut table: Children<T> = std::array::from_fn(|_| None);
    for (slot, child) in table.iter_mut().zip(children) {
        *slot = Some(child);
    }
    Node::Branch(table)
}

/// A branch with no children.
pub(crate) fn empty_branch<T>() -> Node<T> {
    Node::Branch(std::array::from_fn(|_| None))
}

/// Reads the element at `index` below `node`, which sits at `level`.
pub(crate) fn lookup<T>(node: &Node<T>, level: usize, index: usize) -> Option<&T> {
    leaf_at(node, level, index).and_then(|elements| elements.get(index & MASK))
}

/// Returns the leaf storage that holds `index`.
pub(crate) fn leaf_at<T>(
    mut node: &Node<T>,
    mut level: usize,
    index: usize,
) -> Option<&ReferenceCounter<[T]>> {
    loop {
        match node {
            Node::Branch(children) => {
                node = children[(index >> level) & MASK].as_deref()?;
                level = level.checked_sub(BITS_PER_LEVEL)?;
            }
            Node::Leaf(elements) => return Some(elements),
        }
    }
}

/// Builds a fresh spine of single-child branches from `level` down to `leaf`.
pub(crate) fn new_path<T>(level: usize, leaf: Node<T>) -> Node<T> {
    if level == 0 {
        leaf
    } else {
        make_branch([ReferenceCounter::new(new_path(
            level - BITS_PER_LEVEL,
            leaf,
        ))])
    }
}

/// Path-copies `node` with `leaf` installed at the slot covering `offset`.
///
/// Only branches on the path to `offset` are rebuilt.
pub(crate) fn push_leaf<T>(node: &Node<T>, level: usize, offset: usize, leaf: Node<T>) -> Node<T> {
    let Node::Branch(children) = node else {
        return leaf;
    };
    let slot = (offset >> level) & MASK;
    let mut copied = children.clone();
    let child = if level == BITS_PER_LEVEL {
        leaf
    } else {
        match &children[slot] {
            Some(existing) => push_leaf(existing, level - BITS_PER_LEVEL, offset, leaf),
            None => new_path(level - BITS_PER_LEVEL, leaf),
        }
    };
    copied[slot] = Some(ReferenceCounter::new(child));
    Node::Branch(copied)
}

/// Path-copies `node` with the element at `index` replaced by `value`.
pub(crate) fn assoc<T: Clone>(node: &Node<T>, level: usize, index: usize, value: T) -> Node<T> {
    match node {
        Node::Branch(children) => {
            let slot = (index >> level) & MASK;
            let mut copied = children.clone();
            if let Some(child) = &children[slot] {
                copied[slot] = Some(ReferenceCounter::new(assoc(
                    child,
                    level.saturating_sub(BITS_PER_LEVEL),
                    index,
                    value,
                )));
            }
            Node::Branch(copied)
        }
        Node::Leaf(elements) => {
            let mut copied = elements.to_vec();
            if let Some(slot) = copied.get_mut(index & MASK) {
                *slot = value;
            }
            make_leaf(copied)
        }
    }
}

/// Path-copies `node` without the right-most leaf, which covers `index`.
///
/// Returns `None` when the subtree becomes empty.
pub(crate) fn pop_leaf<T>(node: &Node<T>, level: usize, index: usize) -> Option<Node<T>> {
    let Node::Branch(children) = node else {
        return None;
    };
    let slot = (index >> level) & MASK;
    let replacement = if level > BITS_PER_LEVEL {
        children[slot]
            .as_deref()
            .and_then(|child| pop_leaf(child, level - BITS_PER_LEVEL, index))
            .map(ReferenceCounter::new)
    } else {
        None
    };
    if replacement.is_none() && slot == 0 {
        return None;
    }
    let mut copied = children.clone();
    copied[slot] = replacement;
    Some(Node::Branch(copied))
}

/// Builds a packed trie over `elements`, whose length is a multiple of
/// [`BRANCHING_FACTOR`]. Returns the root and its shift.
pub(crate) fn build_root<T>(elements: Vec<T>) -> (ReferenceCounter<Node<T>>, usize) {
    let mut level: Vec<ReferenceCounter<Node<T>>> = Vec::new();
    let mut remaining = elements.into_iter();
    loop {
        let chunk: Vec<T> = remaining.by_ref().take(BRANCHING_FACTOR).collect();
        if chunk.is_empty() {
            break;
        }
        level.push(ReferenceCounter::new(make_leaf(chunk)));
    }

    let mut shift = BITS_PER_LEVEL;
    while level.len() > BRANCHING_FACTOR {
        let mut parents = Vec::with_capacity(level.len().div_ceil(BRANCHING_FACTOR));
        let mut children = level.into_iter();
        loop {
            let chunk: Vec<_> = children.by_ref().take(BRANCHING_FACTOR).collect();
            if chunk.is_empty() {
                break;
            }
            parents.push(ReferenceCounter::new(make_branch(chunk)));
        }
        level = parents;
        shift += BITS_PER_LEVEL;
    }

    (ReferenceCounter::new(make_branch(level)), shift)
}
