// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Descent paths.
//!
//! A `Path` records, level by level, which child a position falls into on
//! the way from the root to a leaf. The engine keeps the most recent one
//! and stamps it with the structural modification counter; while the stamp
//! matches, a nearby position is resolved by adjusting the leaf index alone.
//!
//! Steps hold plain arena handles. A handle is only followed after the
//! stamp has been checked against the current counter.

use smallvec::SmallVec;

use crate::node::{Node, NodeIdx, Slots};

/// Levels kept inline before the chain spills to the heap.
const INLINE_LEVELS: usize = 8;

/// One level of a descent. The parent of step `i` is step `i - 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PathStep {
    pub(crate) node: NodeIdx,
    /// Chosen child slot, or the element index when `node` is a leaf.
    pub(crate) child: usize,
    /// Position remaining inside the chosen child.
    pub(crate) offset: usize,
}

impl PathStep {
    /// Pick the child of `self.node` containing `pos`, a position local to
    /// this subtree. Returns `None` at a leaf, where `pos` is the element
    /// index itself.
    ///
    /// Scans from whichever end of the child list is closer to `pos`, which
    /// halves the average number of children probed on wide nodes.
    pub(crate) fn find_child<T>(&mut self, nodes: &[Node<T>], pos: usize) -> Option<NodeIdx> {
        let node = &nodes[self.node as usize];
        let children = match &node.slots {
            Slots::Leaf(_) => {
                self.child = pos;
                self.offset = pos;
                return None;
            }
            Slots::Internal(children) => children.as_slice(),
        };

        if pos > node.count >> 1 {
            let mut sum = node.count;
            for (i, &child) in children.iter().enumerate().rev() {
                sum -= nodes[child as usize].count;
                if sum <= pos {
                    self.child = i;
                    self.offset = pos - sum;
                    return Some(child);
                }
            }
        } else {
            let mut sum = 0;
            for (i, &child) in children.iter().enumerate() {
                let count = nodes[child as usize].count;
                sum += count;
                if sum > pos {
                    self.child = i;
                    self.offset = pos - (sum - count);
                    return Some(child);
                }
            }
        }
        panic!("position {} out of range for subtree of {}", pos, node.count);
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Path {
    /// Never shrinks; levels past `depth` are stale leftovers.
    steps: SmallVec<[PathStep; INLINE_LEVELS]>,
    depth: usize,
    /// Position the leaf step currently resolves.
    position: usize,
    /// Structural modification counter at resolution time.
    stamp: Option<u64>,
}

impl Path {
    #[inline(always)]
    pub(crate) fn depth(&self) -> usize {
        return self.depth;
    }

    #[inline(always)]
    pub(crate) fn step(&self, level: usize) -> PathStep {
        return self.steps[level];
    }

    #[inline(always)]
    pub(crate) fn leaf(&self) -> PathStep {
        return self.steps[self.depth - 1];
    }

    /// Re-target the cached path at `pos` without descending.
    ///
    /// Hits when the stamp still matches and `pos` lands inside the cached
    /// leaf, or exactly one past its end when `pos == len` (append).
    pub(crate) fn reuse<T>(&mut self, nodes: &[Node<T>], pos: usize, len: usize, stamp: u64) -> bool {
        if self.stamp != Some(stamp) {
            return false;
        }
        let leaf = &mut self.steps[self.depth - 1];
        let idx = if pos >= self.position {
            leaf.child + (pos - self.position)
        } else {
            match leaf.child.checked_sub(self.position - pos) {
                Some(idx) => idx,
                None => return false,
            }
        };
        let occupancy = nodes[leaf.node as usize].occupancy();
        if idx < occupancy || (pos == len && idx == occupancy) {
            leaf.child = idx;
            leaf.offset = idx;
            self.position = pos;
            return true;
        }
        return false;
    }

    /// Resolve `pos` from the root down, reusing step slots from earlier
    /// descents.
    pub(crate) fn descend<T>(&mut self, nodes: &[Node<T>], root: NodeIdx, pos: usize, stamp: u64) {
        self.position = pos;
        self.stamp = Some(stamp);

        let mut node = root;
        let mut pos = pos;
        let mut level = 0;
        loop {
            if level == self.steps.len() {
                self.steps.push(PathStep::default());
            }
            let step = &mut self.steps[level];
            step.node = node;
            match step.find_child(nodes, pos) {
                Some(child) => {
                    pos = step.offset;
                    node = child;
                    level += 1;
                }
                None => break,
            }
        }
        self.depth = level + 1;
    }

    pub(crate) fn invalidate(&mut self) {
        self.stamp = None;
    }

    #[cfg(test)]
    pub(crate) fn stamp(&self) -> Option<u64> {
        return self.stamp;
    }

    #[cfg(test)]
    pub(crate) fn chain_len(&self) -> usize {
        return self.steps.len();
    }
}
