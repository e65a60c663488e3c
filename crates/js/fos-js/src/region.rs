//! Page region
//!
//! Bulk allocation for per-page script objects. Objects are addressed by
//! typed indices, never freed one by one, and the whole region is released
//! in one go when the page closes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::mutation::{MutationObserver, Registration};

/// Typed index into an [`Arena`]
pub struct Idx<T> {
    raw: u32,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Idx<T> {
    pub(crate) fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _ty: PhantomData,
        }
    }

    /// Position in the arena
    pub fn raw(self) -> u32 {
        self.raw
    }
}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Idx<T> {}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.raw)
    }
}

/// Append-only arena
#[derive(Debug)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item` for the lifetime of the arena
    pub fn alloc(&mut self, item: T) -> Idx<T> {
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(item);
        idx
    }

    /// Like [`Arena::alloc`] for items that store their own handle
    pub fn alloc_with(&mut self, make: impl FnOnce(Idx<T>) -> T) -> Idx<T> {
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(make(idx));
        idx
    }

    pub fn get(&self, idx: Idx<T>) -> Option<&T> {
        self.items.get(idx.raw as usize)
    }

    pub fn get_mut(&mut self, idx: Idx<T>) -> Option<&mut T> {
        self.items.get_mut(idx.raw as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Idx<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Idx::from_raw(i as u32), item))
    }
}

/// Everything the mutation observers of one page allocate
#[derive(Debug, Default)]
pub struct PageRegion {
    pub observers: Arena<MutationObserver>,
    pub registrations: Arena<Registration>,
}

/// What a region held when it was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStats {
    pub observers: usize,
    pub registrations: usize,
    pub pending_records: usize,
}

impl PageRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every object at once
    pub fn release(self) -> RegionStats {
        RegionStats {
            observers: self.observers.len(),
            registrations: self.registrations.len(),
            pending_records: self
                .observers
                .iter()
                .map(|(_, observer)| observer.pending_records().len())
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_handles() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");

        assert_ne!(a, b);
        assert_eq!(arena.get(b), Some(&"b"));
        *arena.get_mut(a).unwrap() = "z";
        assert_eq!(arena.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec!["z", "b"]);
        assert_eq!(format!("{:?}", b), "Idx(1)");
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut big: Arena<u8> = Arena::new();
        big.alloc(1);
        let stale = big.alloc(2);

        let small: Arena<u8> = Arena::new();
        assert!(small.get(stale).is_none());
    }

    #[test]
    fn test_empty_region_release() {
        let stats = PageRegion::new().release();
        assert_eq!(
            stats,
            RegionStats {
                observers: 0,
                registrations: 0,
                pending_records: 0
            }
        );
    }
}
