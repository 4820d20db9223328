// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! B-tree Vector
//!
//! An indexed sequence stored as a B-tree whose nodes carry subtree element
//! counts instead of keys.
//!
//! Structure:
//! - Leaf nodes store up to `max_leaf` elements
//! - Internal nodes store up to `max_fanout` child handles
//! - All nodes live in one arena `Vec` with a free list (no raw pointers)
//!
//! Operations:
//! - get/set: O(log n), O(1) when the cached descent path still covers the position
//! - insert: O(log n) - splits overflowing nodes bottom-up, growing the root last
//! - remove: O(log n) - merges or borrows for underflowing nodes, trims the root
//!
//! Every split, merge, borrow and root change bumps a modification counter
//! that invalidates the cached path.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

use crate::block::Block;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::node::{Node, NodeIdx, Slots};
use crate::path::Path;

/// An entry on its way into a node: an element for a leaf, or the freshly
/// split sibling of a child for an internal node.
enum Entry<T> {
    Value(T),
    Child(NodeIdx),
}

/// A growable sequence with O(log n) positional insert and remove.
///
/// ```
/// use seqtree::BTreeVec;
///
/// let mut list = BTreeVec::new();
/// list.push("b");
/// list.insert(0, "a");
/// list.push("c");
/// assert_eq!(list.len(), 3);
/// assert_eq!(list[1], "b");
/// assert_eq!(list.remove(0), "a");
/// ```
#[derive(Clone)]
pub struct BTreeVec<T> {
    /// Node arena. Freed slots hold vacant nodes until reused.
    nodes: Vec<Node<T>>,
    /// Free list of arena handles.
    free: Vec<NodeIdx>,
    root: NodeIdx,
    config: Config,
    /// Structural modification counter.
    mod_count: u64,
    /// Descent path of the most recently resolved position.
    cache: RefCell<Path>,
}

impl<T> BTreeVec<T> {
    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.nodes[self.root as usize].count;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    pub fn config(&self) -> &Config {
        return &self.config;
    }

    /// Number of levels, counting the leaves. A leaf root has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.nodes[self.root as usize];
        while !node.is_leaf() {
            node = &self.nodes[node.child(0) as usize];
            height += 1;
        }
        return height;
    }

    fn check(&self, pos: usize, bound: usize) -> Result<()> {
        if pos >= bound {
            return Err(Error::OutOfRange { index: pos, len: self.len() });
        }
        return Ok(());
    }

    /// Point `path` at `pos`, reusing it when the stamp and leaf allow.
    fn resolve(&self, path: &mut Path, pos: usize) {
        if self.config.path_cache && path.reuse(&self.nodes, pos, self.len(), self.mod_count) {
            return;
        }
        path.descend(&self.nodes, self.root, pos, self.mod_count);
    }

    /// Returns `(leaf, index in leaf)` for an already bounds-checked position.
    fn locate(&self, pos: usize) -> (NodeIdx, usize) {
        let mut path = self.cache.borrow_mut();
        self.resolve(&mut path, pos);
        let leaf = path.leaf();
        return (leaf.node, leaf.child);
    }

    fn values(&self, leaf: NodeIdx) -> &Block<T> {
        return match &self.nodes[leaf as usize].slots {
            Slots::Leaf(values) => values,
            Slots::Internal(_) => unreachable!("descent ended at internal node {}", leaf),
        };
    }

    fn values_mut(&mut self, leaf: NodeIdx) -> &mut Block<T> {
        return match &mut self.nodes[leaf as usize].slots {
            Slots::Leaf(values) => values,
            Slots::Internal(_) => unreachable!("descent ended at internal node {}", leaf),
        };
    }

    /// Borrow two distinct arena nodes mutably.
    fn pair_mut(&mut self, a: NodeIdx, b: NodeIdx) -> (&mut Node<T>, &mut Node<T>) {
        let (a, b) = (a as usize, b as usize);
        assert_ne!(a, b, "node {} paired with itself", a);
        if a < b {
            let (head, tail) = self.nodes.split_at_mut(b);
            return (&mut head[a], &mut tail[0]);
        }
        let (head, tail) = self.nodes.split_at_mut(a);
        return (&mut tail[0], &mut head[b]);
    }

    fn release(&mut self, idx: NodeIdx) {
        self.nodes[idx as usize] = Node::vacant();
        self.free.push(idx);
    }

    fn occupancy(&self, idx: NodeIdx) -> usize {
        return self.nodes[idx as usize].occupancy();
    }
}

impl<T: Default> BTreeVec<T> {
    /// An empty sequence with the default capacities.
    pub fn new() -> BTreeVec<T> {
        return BTreeVec::from_config(Config::default());
    }

    pub fn with_config(config: Config) -> Result<BTreeVec<T>> {
        config.validate()?;
        return Ok(BTreeVec::from_config(config));
    }

    fn from_config(config: Config) -> BTreeVec<T> {
        return BTreeVec {
            nodes: vec![Node::leaf(config.max_leaf)],
            free: Vec::new(),
            root: 0,
            config,
            mod_count: 0,
            cache: RefCell::new(Path::default()),
        };
    }

    /// Drop every element and start over from a single empty leaf.
    pub fn clear(&mut self) {
        let len = self.len();
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Node::leaf(self.config.max_leaf));
        self.root = 0;
        self.mod_count += 1;
        self.cache.get_mut().invalidate();
        debug!(len, "cleared");
    }

    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn get(&self, pos: usize) -> &T {
        return match self.try_get(pos) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        };
    }

    pub fn try_get(&self, pos: usize) -> Result<&T> {
        self.check(pos, self.len())?;
        let (leaf, idx) = self.locate(pos);
        return Ok(self.values(leaf).get(idx));
    }

    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn get_mut(&mut self, pos: usize) -> &mut T {
        if let Err(err) = self.check(pos, self.len()) {
            panic!("{}", err);
        }
        let (leaf, idx) = self.locate(pos);
        return self.values_mut(leaf).get_mut(idx);
    }

    /// Replace the element at `pos`, returning the old one. Never changes
    /// the tree shape.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn set(&mut self, pos: usize, value: T) -> T {
        return match self.try_set(pos, value) {
            Ok(old) => old,
            Err(err) => panic!("{}", err),
        };
    }

    pub fn try_set(&mut self, pos: usize, value: T) -> Result<T> {
        self.check(pos, self.len())?;
        let (leaf, idx) = self.locate(pos);
        return Ok(self.values_mut(leaf).set(idx, value));
    }

    /// Append to the end.
    pub fn push(&mut self, value: T) {
        let len = self.len();
        self.insert_at(len, value);
    }

    /// Insert at `pos`, shifting every element at or after it up by one.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert(&mut self, pos: usize, value: T) {
        if let Err(err) = self.try_insert(pos, value) {
            panic!("{}", err);
        }
    }

    pub fn try_insert(&mut self, pos: usize, value: T) -> Result<()> {
        self.check(pos, self.len() + 1)?;
        self.insert_at(pos, value);
        return Ok(());
    }

    /// Remove and return the element at `pos`, shifting everything after it
    /// down by one.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn remove(&mut self, pos: usize) -> T {
        return match self.try_remove(pos) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        };
    }

    pub fn try_remove(&mut self, pos: usize) -> Result<T> {
        self.check(pos, self.len())?;
        return Ok(self.remove_at(pos));
    }

    /// Allocate a node, reusing a freed slot if available.
    fn alloc(&mut self, node: Node<T>) -> NodeIdx {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            return idx;
        }
        let idx = self.nodes.len() as NodeIdx;
        self.nodes.push(node);
        return idx;
    }

    fn insert_at(&mut self, pos: usize, value: T) {
        let mut path = mem::take(self.cache.get_mut());
        self.resolve(&mut path, pos);

        let leaf_level = path.depth() - 1;
        let mut pending = Some(Entry::Value(value));
        for level in (0..path.depth()).rev() {
            let step = path.step(level);
            self.nodes[step.node as usize].count += 1;
            // Once a level absorbs the entry, ancestors only need their counts bumped
            if let Some(entry) = pending.take() {
                let at = if level == leaf_level { step.child } else { step.child + 1 };
                pending = self.insert_entry(step.node, at, entry, level == 0).map(Entry::Child);
            }
        }

        *self.cache.get_mut() = path;
    }

    /// Place `entry` at slot `at` of `node`, splitting first if the node is
    /// full. Returns the new right sibling that the parent must adopt.
    fn insert_entry(&mut self, node: NodeIdx, at: usize, entry: Entry<T>, is_root: bool) -> Option<NodeIdx> {
        let capacity = self.nodes[node as usize].capacity();
        if self.occupancy(node) < capacity {
            self.place(node, at, entry);
            return None;
        }

        let half = capacity >> 1;
        let empty = self.nodes[node as usize].sibling();
        let sibling = self.alloc(empty);
        self.mod_count += 1;

        let moved = self.shift(node, half, sibling, 0, capacity - half);
        let left = &mut self.nodes[node as usize];
        left.count -= moved;
        left.remove_range(half, capacity - half);

        if at < half {
            self.place(node, at, entry);
        } else {
            let weight = self.weight(&entry);
            self.place(sibling, at - half, entry);
            self.nodes[sibling as usize].count += weight;
            self.nodes[node as usize].count -= weight;
        }
        trace!(
            node,
            sibling,
            left = self.nodes[node as usize].count,
            right = self.nodes[sibling as usize].count,
            "split"
        );

        if is_root {
            self.grow_root(node, sibling);
            return None;
        }
        return Some(sibling);
    }

    fn place(&mut self, node: NodeIdx, at: usize, entry: Entry<T>) {
        match (&mut self.nodes[node as usize].slots, entry) {
            (Slots::Leaf(values), Entry::Value(value)) => values.insert(at, value),
            (Slots::Internal(children), Entry::Child(child)) => children.insert(at, child),
            _ => unreachable!("entry kind does not match node {}", node),
        }
    }

    fn weight(&self, entry: &Entry<T>) -> usize {
        return match entry {
            Entry::Value(_) => 1,
            Entry::Child(child) => self.nodes[*child as usize].count,
        };
    }

    /// The old root overflowed into `left` and `right`; put a new root above them.
    fn grow_root(&mut self, left: NodeIdx, right: NodeIdx) {
        let mut root = Node::internal(self.config.max_fanout);
        root.count = self.nodes[left as usize].count + self.nodes[right as usize].count;
        if let Slots::Internal(children) = &mut root.slots {
            children.push(left);
            children.push(right);
        }
        self.root = self.alloc(root);
        self.mod_count += 1;
        debug!(height = self.height(), len = self.len(), "root split");
    }

    /// Move `count` entries of `src` starting at `from` into `dst` at `to`,
    /// crediting `dst` with the elements they carry. The caller settles the
    /// source side. Returns the number of elements moved.
    fn shift(&mut self, src: NodeIdx, from: usize, dst: NodeIdx, to: usize, count: usize) -> usize {
        let node = &self.nodes[src as usize];
        let moved = if node.is_leaf() {
            count
        } else {
            node.children()[from..from + count]
                .iter()
                .map(|&child| self.nodes[child as usize].count)
                .sum()
        };

        let (source, dest) = self.pair_mut(src, dst);
        match (&mut source.slots, &mut dest.slots) {
            (Slots::Leaf(a), Slots::Leaf(b)) => a.transfer(b, from, to, count),
            (Slots::Internal(a), Slots::Internal(b)) => a.transfer(b, from, to, count),
            _ => unreachable!("cannot move entries between a leaf and an internal node"),
        }
        dest.count += moved;
        self.mod_count += 1;
        return moved;
    }

    fn remove_at(&mut self, pos: usize) -> T {
        let mut path = mem::take(self.cache.get_mut());
        self.resolve(&mut path, pos);

        let leaf = path.leaf();
        let value = self.values_mut(leaf.node).remove(leaf.child);

        let mut rebalance = true;
        for level in (0..path.depth()).rev() {
            let step = path.step(level);
            self.nodes[step.node as usize].count -= 1;
            if rebalance && level > 0 {
                let parent = path.step(level - 1);
                rebalance = self.rebalance(step.node, parent.node, parent.child);
            }
        }
        self.trim_root();

        *self.cache.get_mut() = path;
        return value;
    }

    /// Restore the occupancy of `node`, child `slot` of `parent`, after a
    /// removal. Returns true when a merge took a slot away from `parent`,
    /// which may leave the parent underfull in turn.
    fn rebalance(&mut self, node: NodeIdx, parent: NodeIdx, slot: usize) -> bool {
        let size = self.occupancy(node);
        let half = self.nodes[node as usize].half();
        if size >= half {
            return false;
        }
        let capacity = self.nodes[node as usize].capacity();

        let siblings = self.occupancy(parent);
        let left = if slot > 0 { Some(self.nodes[parent as usize].child(slot - 1)) } else { None };
        let right = if slot + 1 < siblings { Some(self.nodes[parent as usize].child(slot + 1)) } else { None };

        if let Some(left) = left {
            if self.occupancy(left) + size <= capacity {
                self.merge(node, left, parent, slot);
                return true;
            }
        }
        if let Some(right) = right {
            if self.occupancy(right) + size <= capacity {
                self.merge(right, node, parent, slot + 1);
                return true;
            }
        }

        // Take half the sibling's surplus when that beats the bare deficit,
        // so the next few removals find this node above half again.
        let deficit = half - size;
        if let Some(right) = right {
            let spare = self.occupancy(right);
            if spare > half {
                let count = deficit.max((spare - half) >> 1);
                self.borrow_entries(right, 0, node, size, count);
                return false;
            }
        }
        if let Some(left) = left {
            let spare = self.occupancy(left);
            if spare > half {
                let count = deficit.max((spare - half) >> 1);
                self.borrow_entries(left, spare - count, node, 0, count);
                return false;
            }
        }
        return false;
    }

    /// Append all of `src` to `dst` and drop `src` from slot `slot` of `parent`.
    fn merge(&mut self, src: NodeIdx, dst: NodeIdx, parent: NodeIdx, slot: usize) {
        let count = self.occupancy(src);
        let at = self.occupancy(dst);
        self.shift(src, 0, dst, at, count);
        self.release(src);
        match &mut self.nodes[parent as usize].slots {
            Slots::Internal(children) => {
                children.remove(slot);
            }
            Slots::Leaf(_) => unreachable!("parent {} is a leaf", parent),
        }
        trace!(src, dst, count, "merge");
    }

    fn borrow_entries(&mut self, src: NodeIdx, from: usize, dst: NodeIdx, to: usize, count: usize) {
        let moved = self.shift(src, from, dst, to, count);
        let source = &mut self.nodes[src as usize];
        source.count -= moved;
        source.remove_range(from, count);
        trace!(src, dst, count, "borrow");
    }

    /// Promote the only child of an internal root until the root is a leaf
    /// or has at least two children.
    fn trim_root(&mut self) {
        while !self.nodes[self.root as usize].is_leaf() && self.occupancy(self.root) == 1 {
            let old = self.root;
            self.root = self.nodes[old as usize].child(0);
            self.release(old);
            self.mod_count += 1;
            debug!(height = self.height(), len = self.len(), "root collapsed");
        }
    }
}

impl<T: Default> Default for BTreeVec<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T> fmt::Debug for BTreeVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("BTreeVec")
            .field("len", &self.len())
            .field("height", &self.height())
            .field("config", &self.config)
            .finish();
    }
}

impl<T: Default> Index<usize> for BTreeVec<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        return self.get(pos);
    }
}

impl<T: Default> IndexMut<usize> for BTreeVec<T> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        return self.get_mut(pos);
    }
}

#[cfg(test)]
impl<T> BTreeVec<T> {
    /// Walk the whole tree and assert every structural invariant.
    pub(crate) fn check_invariants(&self) {
        let mut leaf_depth = None;
        let mut live = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            live += 1;
            let node = &self.nodes[idx as usize];
            let occupancy = node.occupancy();
            if idx == self.root {
                assert!(node.is_leaf() || occupancy >= 2, "internal root with {} children", occupancy);
            } else {
                assert!(
                    occupancy >= node.half() && occupancy <= node.capacity(),
                    "node {} holds {} of {}",
                    idx,
                    occupancy,
                    node.capacity()
                );
            }
            match &node.slots {
                Slots::Leaf(values) => {
                    assert_eq!(values.max(), self.config.max_leaf);
                    assert_eq!(node.count, occupancy, "leaf {} count", idx);
                    match leaf_depth {
                        None => leaf_depth = Some(depth),
                        Some(expected) => assert_eq!(depth, expected, "leaves at different depths"),
                    }
                }
                Slots::Internal(children) => {
                    assert_eq!(children.max(), self.config.max_fanout);
                    let sum: usize = children.as_slice().iter().map(|&c| self.nodes[c as usize].count).sum();
                    assert_eq!(node.count, sum, "internal {} count", idx);
                    for &child in children.as_slice() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
        assert_eq!(leaf_depth, Some(self.height()));
        assert_eq!(live + self.free.len(), self.nodes.len(), "arena slots leaked");
    }

    /// Occupancy of each child of the root, left to right.
    pub(crate) fn root_occupancies(&self) -> Vec<usize> {
        return self.nodes[self.root as usize]
            .children()
            .iter()
            .map(|&child| self.occupancy(child))
            .collect();
    }

    pub(crate) fn mod_count(&self) -> u64 {
        return self.mod_count;
    }

    pub(crate) fn cached_stamp(&self) -> Option<u64> {
        return self.cache.borrow().stamp();
    }
}
