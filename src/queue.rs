//! Binary min-heap over elements that live in a caller-owned arena.
//!
//! The heap stores arena indices and writes each element's current heap position back onto the
//! element itself, so `decrease_key` can find an element without a separate position map.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// Elements that remember where they sit in a [`PriorityQueue`].
pub trait HeapSlot {
    fn heap_slot(&self) -> Option<usize>;
    fn set_heap_slot(&mut self, slot: Option<usize>);
}

pub struct PriorityQueue<T, F> {
    data: Vec<usize>,
    compare: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> PriorityQueue<T, F>
where
    T: HeapSlot,
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self { data: Vec::new(), compare, _marker: PhantomData }
    }

    pub fn with_capacity(capacity: usize, compare: F) -> Self {
        Self { data: Vec::with_capacity(capacity), compare, _marker: PhantomData }
    }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn push(&mut self, arena: &mut [T], element: usize) {
        debug_assert!(arena[element].heap_slot().is_none(), "Element {element} is already queued.");
        let slot = self.data.len();
        arena[element].set_heap_slot(Some(slot));
        self.data.push(element);
        self.sift_up(arena, slot);
    }

    /// Removes and returns the smallest element, or `None` if the queue is empty.
    pub fn pop_min(&mut self, arena: &mut [T]) -> Option<usize> {
        let last = self.data.len().checked_sub(1)?;
        self.swap(arena, 0, last);
        let min = self.data.pop()?;
        arena[min].set_heap_slot(None);
        self.sift_down(arena, 0);
        Some(min)
    }

    /// Restores heap order after the priority of `element` has gone down. Elements that are not
    /// queued are left alone.
    pub fn decrease_key(&mut self, arena: &mut [T], element: usize) {
        match arena[element].heap_slot() {
            Some(slot) => {
                debug_assert_eq!(self.data[slot], element);
                self.sift_up(arena, slot);
            }
            None => log::trace!("decrease_key on element {element} which is not queued"),
        }
    }

    fn less(&self, arena: &[T], a: usize, b: usize) -> bool {
        (self.compare)(&arena[self.data[a]], &arena[self.data[b]]) == Ordering::Less
    }

    fn swap(&mut self, arena: &mut [T], a: usize, b: usize) {
        self.data.swap(a, b);
        arena[self.data[a]].set_heap_slot(Some(a));
        arena[self.data[b]].set_heap_slot(Some(b));
    }

    fn sift_up(&mut self, arena: &mut [T], mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(arena, slot, parent) {
                break;
            }
            self.swap(arena, slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, arena: &mut [T], mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < self.data.len() && self.less(arena, left, smallest) {
                smallest = left;
            }
            if right < self.data.len() && self.less(arena, right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(arena, slot, smallest);
            slot = smallest;
        }
    }
}
