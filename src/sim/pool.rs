//! Fixed-capacity slot arena
//!
//! Every entity pool in the simulation is a `SlotPool`: a fixed number of
//! slots, each either occupied or free. Insertion claims the lowest free slot
//! so replays with the same inputs fill slots in the same order. A full pool
//! drops insertions silently.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPool<T> {
    slots: Vec<Option<T>>,
}

impl<T> SlotPool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Place `value` in the first free slot, returning its index.
    /// Returns `None` (and drops the value) when every slot is occupied.
    pub fn claim(&mut self, value: T) -> Option<usize> {
        let index = self.first_free()?;
        self.slots[index] = Some(value);
        Some(index)
    }

    /// Index of the first free slot, if any
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Free a slot. Out-of-range or already free indices are ignored.
    pub fn release(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Occupied slots with their indices, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// Run `f` on every occupied slot; slots for which it returns `false` are freed
    pub fn retain_mut(&mut self, mut f: impl FnMut(usize, &mut T) -> bool) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot {
                if !f(i, value) {
                    *slot = None;
                }
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.first_free().is_none()
    }

    /// Free every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}
