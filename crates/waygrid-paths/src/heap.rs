//! An indexed binary heap over handles into a caller-owned item arena.
//!
//! Unlike [`std::collections::BinaryHeap`], every item records the slot it
//! currently occupies, which gives O(1) membership tests and lets a queued
//! item be moved up in place after its priority improves.

use std::cmp::Ordering;

/// An item that can be queued in an [`IndexedHeap`].
///
/// The heap owns the value returned by [`heap_index`](Self::heap_index)
/// while the item is queued; it never orders items by it.
pub trait HeapItem {
    fn heap_index(&self) -> usize;
    fn set_heap_index(&mut self, index: usize);

    /// `Greater` when `self` should leave the heap before `other`.
    fn priority_cmp(&self, other: &Self) -> Ordering;
}

/// A max-heap (under [`HeapItem::priority_cmp`]) of handles into an arena
/// of items.
///
/// Handles are plain indices into the `items` slice passed to each call.
/// The same slice must be passed to every call between two
/// [`clear`](Self::clear)s.
#[derive(Clone, Debug, Default)]
pub struct IndexedHeap {
    slots: Vec<usize>,
    capacity: usize,
}

impl IndexedHeap {
    /// Create an empty heap that may hold at most `capacity` handles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every queued handle. Item indices are left untouched.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Queued handles in slot order.
    #[inline]
    pub fn handles(&self) -> &[usize] {
        &self.slots
    }

    /// The best queued handle, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Queue `handle`. It must not already be queued.
    pub fn add<T: HeapItem>(&mut self, items: &mut [T], handle: usize) {
        debug_assert!(
            self.slots.len() < self.capacity,
            "IndexedHeap: capacity {} exceeded",
            self.capacity
        );
        debug_assert!(!self.contains(items, handle), "IndexedHeap: handle {handle} queued twice");
        items[handle].set_heap_index(self.slots.len());
        self.slots.push(handle);
        self.sift_up(items, handle);
    }

    /// Remove and return the best handle, or `None` if the heap is empty.
    pub fn pop_best<T: HeapItem>(&mut self, items: &mut [T]) -> Option<usize> {
        let last = self.slots.pop()?;
        if self.slots.is_empty() {
            return Some(last);
        }
        let best = std::mem::replace(&mut self.slots[0], last);
        items[last].set_heap_index(0);
        self.sift_down(items, last);
        Some(best)
    }

    /// Restore order after the priority of a queued `handle` improved.
    ///
    /// Only moves the item towards the root: calling this after a priority
    /// got *worse* leaves the heap out of order.
    pub fn update_item<T: HeapItem>(&mut self, items: &mut [T], handle: usize) {
        debug_assert!(self.contains(items, handle), "IndexedHeap: handle {handle} not queued");
        self.sift_up(items, handle);
    }

    /// Whether this exact `handle` is queued.
    #[inline]
    pub fn contains<T: HeapItem>(&self, items: &[T], handle: usize) -> bool {
        self.slots.get(items[handle].heap_index()) == Some(&handle)
    }

    fn sift_up<T: HeapItem>(&mut self, items: &mut [T], handle: usize) {
        let mut index = items[handle].heap_index();
        while index > 0 {
            let parent = (index - 1) / 2;
            if items[handle].priority_cmp(&items[self.slots[parent]]) != Ordering::Greater {
                return;
            }
            self.swap(items, index, parent);
            index = parent;
        }
    }

    fn sift_down<T: HeapItem>(&mut self, items: &mut [T], handle: usize) {
        let mut index = items[handle].heap_index();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            if left >= self.slots.len() {
                return;
            }
            let mut child = left;
            if right < self.slots.len()
                && items[self.slots[left]].priority_cmp(&items[self.slots[right]]) == Ordering::Less
            {
                child = right;
            }
            if items[handle].priority_cmp(&items[self.slots[child]]) != Ordering::Less {
                return;
            }
            self.swap(items, index, child);
            index = child;
        }
    }

    fn swap<T: HeapItem>(&mut self, items: &mut [T], a: usize, b: usize) {
        self.slots.swap(a, b);
        items[self.slots[a]].set_heap_index(a);
        items[self.slots[b]].set_heap_index(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Best-first by lowest `f`, then lowest `h`.
    #[derive(Clone, Debug)]
    struct Entry {
        f: i32,
        h: i32,
        index: usize,
    }

    impl Entry {
        fn new(f: i32, h: i32) -> Self {
            Self {
                f,
                h,
                index: usize::MAX,
            }
        }
    }

    impl HeapItem for Entry {
        fn heap_index(&self) -> usize {
            self.index
        }
        fn set_heap_index(&mut self, index: usize) {
            self.index = index;
        }
        fn priority_cmp(&self, other: &Self) -> Ordering {
            other.f.cmp(&self.f).then(other.h.cmp(&self.h))
        }
    }

    fn assert_heap(heap: &IndexedHeap, items: &[Entry]) {
        for (slot, &handle) in heap.handles().iter().enumerate() {
            assert_eq!(items[handle].index, slot, "stale index for handle {handle}");
            if slot > 0 {
                let parent = heap.handles()[(slot - 1) / 2];
                assert_ne!(
                    items[parent].priority_cmp(&items[handle]),
                    Ordering::Less,
                    "parent {parent} ranks below child {handle}"
                );
            }
        }
    }

    #[test]
    fn pops_lowest_f_first() {
        let mut items: Vec<_> = [(30, 0), (10, 0), (20, 0), (5, 0), (25, 0)]
            .into_iter()
            .map(|(f, h)| Entry::new(f, h))
            .collect();
        let mut heap = IndexedHeap::with_capacity(items.len());
        for h in 0..items.len() {
            heap.add(&mut items, h);
            assert_heap(&heap, &items);
        }
        let mut order = Vec::new();
        while let Some(h) = heap.pop_best(&mut items) {
            order.push(items[h].f);
        }
        assert_eq!(order, vec![5, 10, 20, 25, 30]);
        assert!(heap.is_empty());
    }

    #[test]
    fn ties_break_towards_lower_h() {
        let mut items = vec![Entry::new(40, 30), Entry::new(40, 10), Entry::new(40, 20)];
        let mut heap = IndexedHeap::with_capacity(3);
        for h in 0..3 {
            heap.add(&mut items, h);
        }
        assert_eq!(heap.pop_best(&mut items), Some(1));
        assert_eq!(heap.pop_best(&mut items), Some(2));
        assert_eq!(heap.pop_best(&mut items), Some(0));
    }

    #[test]
    fn pop_empty_is_none() {
        let mut items: Vec<Entry> = Vec::new();
        let mut heap = IndexedHeap::with_capacity(4);
        assert_eq!(heap.pop_best(&mut items), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn update_moves_improved_item_up() {
        let mut items = vec![Entry::new(10, 0), Entry::new(20, 0), Entry::new(30, 0)];
        let mut heap = IndexedHeap::with_capacity(3);
        for h in 0..3 {
            heap.add(&mut items, h);
        }
        items[2].f = 1;
        heap.update_item(&mut items, 2);
        assert_heap(&heap, &items);
        assert_eq!(heap.peek(), Some(2));
    }

    #[test]
    fn contains_tracks_identity() {
        let mut items = vec![Entry::new(10, 0), Entry::new(10, 0), Entry::new(5, 0)];
        let mut heap = IndexedHeap::with_capacity(3);
        heap.add(&mut items, 0);
        // Equal priority, different handle.
        assert!(heap.contains(&items, 0));
        assert!(!heap.contains(&items, 1));

        heap.add(&mut items, 2);
        assert_eq!(heap.pop_best(&mut items), Some(2));
        // Handle 2's old slot is now reused by handle 0.
        assert!(!heap.contains(&items, 2));
        assert!(heap.contains(&items, 0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "capacity")]
    fn exceeding_capacity_panics_in_debug() {
        let mut items = vec![Entry::new(1, 0), Entry::new(2, 0)];
        let mut heap = IndexedHeap::with_capacity(1);
        heap.add(&mut items, 0);
        heap.add(&mut items, 1);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(i32, i32),
        Pop,
        Improve(usize, i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..50, 0i32..20).prop_map(|(f, h)| Op::Add(f, h)),
            2 => Just(Op::Pop),
            2 => (any::<usize>(), 1i32..20).prop_map(|(i, d)| Op::Improve(i, d)),
        ]
    }

    proptest! {
        #[test]
        fn invariant_and_order_hold(ops in prop::collection::vec(op(), 1..120)) {
            let mut items: Vec<Entry> = Vec::new();
            let mut heap = IndexedHeap::with_capacity(ops.len());
            for op in ops {
                match op {
                    Op::Add(f, h) => {
                        items.push(Entry::new(f, h));
                        let handle = items.len() - 1;
                        heap.add(&mut items, handle);
                        prop_assert!(heap.contains(&items, handle));
                    }
                    Op::Pop => {
                        let best_key = heap
                            .handles()
                            .iter()
                            .map(|&h| (items[h].f, items[h].h))
                            .min();
                        let popped = heap.pop_best(&mut items);
                        prop_assert_eq!(popped.map(|h| (items[h].f, items[h].h)), best_key);
                        if let Some(h) = popped {
                            prop_assert!(!heap.contains(&items, h));
                        }
                    }
                    Op::Improve(pick, delta) => {
                        if !heap.is_empty() {
                            let handle = heap.handles()[pick % heap.len()];
                            items[handle].f -= delta;
                            heap.update_item(&mut items, handle);
                        }
                    }
                }
                assert_heap(&heap, &items);
            }
        }
    }
}
