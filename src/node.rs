// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Tree nodes.
//!
//! A node is either a leaf holding elements or an internal node holding
//! arena handles of its children. The kind is fixed at construction.

use crate::block::Block;

/// Index into the node arena.
pub(crate) type NodeIdx = u32;

#[derive(Clone, Debug)]
pub(crate) enum Slots<T> {
    Leaf(Block<T>),
    Internal(Block<NodeIdx>),
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    /// Elements in this subtree.
    pub(crate) count: usize,
    pub(crate) slots: Slots<T>,
}

impl<T> Node<T> {
    /// Placeholder for a freed arena slot.
    pub(crate) fn vacant() -> Node<T> {
        return Node { count: 0, slots: Slots::Leaf(Block::vacant()) };
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        return matches!(self.slots, Slots::Leaf(_));
    }

    /// Entries held in this node's block.
    #[inline(always)]
    pub(crate) fn occupancy(&self) -> usize {
        return match &self.slots {
            Slots::Leaf(values) => values.len(),
            Slots::Internal(children) => children.len(),
        };
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        return match &self.slots {
            Slots::Leaf(values) => values.max(),
            Slots::Internal(children) => children.max(),
        };
    }

    #[inline(always)]
    pub(crate) fn half(&self) -> usize {
        return self.capacity() >> 1;
    }

    #[inline]
    pub(crate) fn child(&self, idx: usize) -> NodeIdx {
        return match &self.slots {
            Slots::Internal(children) => *children.get(idx),
            Slots::Leaf(_) => unreachable!("leaf nodes have no children"),
        };
    }

    #[inline]
    pub(crate) fn children(&self) -> &[NodeIdx] {
        return match &self.slots {
            Slots::Internal(children) => children.as_slice(),
            Slots::Leaf(_) => &[],
        };
    }
}

impl<T: Default> Node<T> {
    pub(crate) fn leaf(max: usize) -> Node<T> {
        return Node { count: 0, slots: Slots::Leaf(Block::new(max)) };
    }

    pub(crate) fn internal(max: usize) -> Node<T> {
        return Node { count: 0, slots: Slots::Internal(Block::new(max)) };
    }

    /// An empty node of the same kind and capacity, used as a split target.
    pub(crate) fn sibling(&self) -> Node<T> {
        return match &self.slots {
            Slots::Leaf(values) => Node::leaf(values.max()),
            Slots::Internal(children) => Node::internal(children.max()),
        };
    }

    pub(crate) fn remove_range(&mut self, start: usize, count: usize) {
        match &mut self.slots {
            Slots::Leaf(values) => values.remove_range(start, count),
            Slots::Internal(children) => children.remove_range(start, count),
        }
    }
}
