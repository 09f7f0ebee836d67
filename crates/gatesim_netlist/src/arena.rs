//! Append-only storage for gates, addressed by [`GateId`](crate::GateId).

use std::marker::PhantomData;
use std::ops::Index;

/// A `u32`-backed key that can address an [`Arena`].
pub trait ArenaId: Copy {
    /// Builds the key for slot `index`.
    fn from_raw(index: u32) -> Self;
    /// The slot this key addresses.
    fn as_raw(self) -> u32;
}

/// Items keyed by the position they were pushed at.
///
/// Nothing is ever removed, so a key handed out by [`Arena::alloc`] stays
/// valid for as long as the arena lives.
#[derive(Debug, Clone)]
pub struct Arena<I: ArenaId, T> {
    slots: Vec<T>,
    _key: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            _key: PhantomData,
        }
    }

    /// Stores `item` and returns the key it can be fetched with.
    pub fn alloc(&mut self, item: T) -> I {
        let key = I::from_raw(self.slots.len() as u32);
        self.slots.push(item);
        key
    }

    /// Panics on a key from a different arena that is out of range.
    pub fn get(&self, key: I) -> &T {
        &self.slots[key.as_raw() as usize]
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` before the first [`Arena::alloc`].
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keys and items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        (0u32..).zip(self.slots.iter()).map(|(raw, item)| (I::from_raw(raw), item))
    }

    /// Items without their keys, oldest first.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, key: I) -> &T {
        self.get(key)
    }
}
