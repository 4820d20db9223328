// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Growable Block
//!
//! A contiguous run of at most `max` entries, stored as a window inside a
//! larger backing `Vec`. Slots outside the window hold `T::default()`, so
//! every move is a `mem::take` or a slice swap and no entry is ever cloned.
//!
//! The window may start at an offset. Removing the first entry slides the
//! start forward instead of shifting the tail, and inserting at the front
//! slides it back while that margin lasts. This makes front-heavy and
//! right-to-left edit patterns O(1) per entry.
//!
//! Indexing is unchecked against the logical length (the engine guarantees
//! valid indices); only the backing `Vec` bounds are enforced.

use std::mem;

use crate::error::Error;

/// Factor applied to the window when a block runs out of room.
const GROWTH: usize = 2;

#[derive(Clone, Debug)]
pub(crate) struct Block<T> {
    /// Backing storage. `buf.len()` is the allocated slot count.
    buf: Vec<T>,
    /// Index in `buf` of the first live entry.
    start: usize,
    /// Number of live entries.
    len: usize,
    /// Hard cap on live entries.
    max: usize,
}

impl<T> Block<T> {
    /// An unallocated block used for freed arena slots.
    pub(crate) const fn vacant() -> Block<T> {
        return Block { buf: Vec::new(), start: 0, len: 0, max: 0 };
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        return self.len;
    }

    #[inline(always)]
    pub(crate) fn max(&self) -> usize {
        return self.max;
    }

    #[inline(always)]
    pub(crate) fn get(&self, idx: usize) -> &T {
        debug_assert!(idx < self.len, "block index {} out of {}", idx, self.len);
        return &self.buf[self.start + idx];
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut T {
        debug_assert!(idx < self.len, "block index {} out of {}", idx, self.len);
        return &mut self.buf[self.start + idx];
    }

    /// Replace an entry, returning the prior one.
    #[inline]
    pub(crate) fn set(&mut self, idx: usize, value: T) -> T {
        return mem::replace(self.get_mut(idx), value);
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        return &self.buf[self.start..self.start + self.len];
    }

    /// Slots available to the window without reallocating.
    #[inline(always)]
    fn window(&self) -> usize {
        return self.buf.len() - self.start;
    }

    /// Shift `[at, len)` left over `count` already-vacated slots.
    fn close(&mut self, at: usize, count: usize) {
        let base = self.start;
        self.buf[base + at..base + self.len].rotate_left(count);
        self.len -= count;
    }
}

impl<T: Default> Block<T> {
    /// A block that starts with room for half of `max` entries.
    pub(crate) fn new(max: usize) -> Block<T> {
        let mut block = Block::vacant();
        block.max = max;
        block.reserve(max / 2);
        return block;
    }

    pub(crate) fn push(&mut self, value: T) {
        self.ensure(self.len + 1);
        let at = self.start + self.len;
        self.buf[at] = value;
        self.len += 1;
    }

    pub(crate) fn insert(&mut self, idx: usize, value: T) {
        debug_assert!(idx <= self.len && self.len < self.max);
        if idx == 0 && self.start > 0 {
            self.start -= 1;
        } else {
            self.open(idx, 1);
        }
        self.len += 1;
        let at = self.start + idx;
        self.buf[at] = value;
    }

    pub(crate) fn remove(&mut self, idx: usize) -> T {
        let value = mem::take(self.get_mut(idx));
        if idx == 0 {
            self.start += 1;
            self.len -= 1;
        } else {
            self.close(idx, 1);
        }
        return value;
    }

    /// Move `count` entries starting at `from` into `dest` at `to`.
    /// The source slots are left holding defaults; follow up with
    /// `remove_range` unless the source block is being discarded.
    pub(crate) fn transfer(&mut self, dest: &mut Block<T>, from: usize, to: usize, count: usize) {
        dest.open(to, count);
        let src = self.start + from;
        let dst = dest.start + to;
        dest.buf[dst..dst + count].swap_with_slice(&mut self.buf[src..src + count]);
        dest.len += count;
    }

    pub(crate) fn remove_range(&mut self, start: usize, count: usize) {
        let base = self.start;
        for slot in &mut self.buf[base + start..base + start + count] {
            *slot = T::default();
        }
        self.close(start, count);
    }

    /// Make room for `count` default slots at `at`, without counting them live.
    fn open(&mut self, at: usize, count: usize) {
        self.ensure(self.len + count);
        let base = self.start;
        if at < self.len {
            self.buf[base + at..base + self.len + count].rotate_right(count);
        }
    }

    fn ensure(&mut self, needed: usize) {
        let window = self.window();
        if needed <= window {
            return;
        }
        let target = self.max.min(needed.max(window * GROWTH));
        debug_assert!(target >= needed, "block of {} cannot hold {} entries", self.max, needed);
        self.reserve(target);
    }

    /// Compact the window to the front, then grow the backing storage to
    /// `target` slots if compaction alone did not free enough room.
    fn reserve(&mut self, target: usize) {
        if self.start > 0 {
            self.buf[..self.start + self.len].rotate_left(self.start);
            self.start = 0;
        }
        if self.buf.len() >= target {
            return;
        }
        let extra = target - self.buf.len();
        if self.buf.try_reserve_exact(extra).is_err() {
            panic!("{}", Error::AllocationFailed { requested: target });
        }
        self.buf.resize_with(target, T::default);
    }
}

impl<T> Default for Block<T> {
    fn default() -> Self {
        return Block::vacant();
    }
}
