//! Binary max-heap over dense ids with a reverse position index.
//!
//! The heap does not own priorities. Callers keep them in their own tables and pass a key
//! function to every operation, which lets two heaps order the same ids by different columns.
//!
//! Index arithmetic is zero based: `parent(i) = (i - 1) / 2`, children are `2i + 1` and `2i + 2`.
//! Invariant between operations: `position[slots[i]] == i` for every slot `i`.

use crate::cost::Cost;
use std::cmp::Ordering;

/// First slot that breaks the heap property or the reverse index.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeapViolation {
    #[error("slot {parent} holds a smaller key than its child slot {child}")]
    Order { parent: usize, child: usize },

    #[error("id {id} sits in slot {slot} but its position index says {recorded}")]
    Position {
        id: usize,
        slot: usize,
        recorded: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct IndexedMaxHeap {
    slots: Vec<usize>,
    position: Vec<usize>,
}

impl IndexedMaxHeap {
    /// Builds a heap holding `ids`, sorted by descending key.
    ///
    /// A descending array already satisfies the heap property. The sort is stable, so ids with
    /// equal keys keep their input order.
    pub fn build(ids: impl IntoIterator<Item = usize>, key: impl Fn(usize) -> Cost) -> Self {
        let mut slots: Vec<usize> = ids.into_iter().collect();
        slots.sort_by(|&a, &b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));

        let len = slots.iter().copied().max().map_or(0, |m| m + 1);
        let mut position: Vec<usize> = vec![usize::MAX; len];
        for (slot, &id) in slots.iter().enumerate() {
            position[id] = slot;
        }
        Self { slots, position }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn peek_max(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: usize) -> Option<usize> {
        self.position
            .get(id)
            .copied()
            .filter(|&slot| slot < self.slots.len())
    }

    /// Ids in slot order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().copied()
    }

    /// Restores the heap after the key of `id` changed by `delta`.
    ///
    /// A positive delta can only move the id towards the root; anything else can only move it
    /// towards the leaves.
    pub fn reheapify(&mut self, id: usize, delta: f64, key: impl Fn(usize) -> Cost) {
        if delta > 0.0 {
            self.increase_key(id, key);
        } else {
            self.decrease_key(id, key);
        }
    }

    pub fn increase_key(&mut self, id: usize, key: impl Fn(usize) -> Cost) {
        let Some(mut pos) = self.position(id) else {
            return;
        };
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if key(self.slots[parent]) < key(self.slots[pos]) {
                self.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    pub fn decrease_key(&mut self, id: usize, key: impl Fn(usize) -> Cost) {
        let Some(mut pos) = self.position(id) else {
            return;
        };
        let n = self.slots.len();
        loop {
            let left = 2 * pos + 1;
            let right = 2 * pos + 2;
            let current = key(self.slots[pos]);
            let left_larger = left < n && current < key(self.slots[left]);
            let right_larger = right < n && current < key(self.slots[right]);
            if !left_larger && !right_larger {
                break;
            }
            // Prefer the right child only when it is strictly larger than the left one.
            let child = if right < n && key(self.slots[left]) < key(self.slots[right]) {
                right
            } else {
                left
            };
            self.swap(pos, child);
            pos = child;
        }
    }

    /// Sinks an id whose key has just become [`Cost::Removed`].
    ///
    /// The slot array keeps its length; removed ids collect at the leaves.
    pub fn remove(&mut self, id: usize, key: impl Fn(usize) -> Cost) {
        self.decrease_key(id, key);
    }

    pub fn validate(&self, key: impl Fn(usize) -> Cost) -> Result<(), HeapViolation> {
        for (slot, &id) in self.slots.iter().enumerate() {
            let recorded = self.position.get(id).copied().unwrap_or(usize::MAX);
            if recorded != slot {
                return Err(HeapViolation::Position { id, slot, recorded });
            }
            for child in [2 * slot + 1, 2 * slot + 2] {
                if child < self.slots.len() && key(id) < key(self.slots[child]) {
                    return Err(HeapViolation::Order {
                        parent: slot,
                        child,
                    });
                }
            }
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.position[self.slots[a]] = a;
        self.position[self.slots[b]] = b;
    }
}
