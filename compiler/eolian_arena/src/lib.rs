//! [`Arena`] is a data structure that allows storing items of type `T` and
//! referencing them by a typed, generational [`ID`]. An [`ID`] remembers the
//! generation of the slot it was issued for, so once the item is removed the
//! ID never resolves again, even if the slot is later reused.

use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Index, IndexMut},
};


/// Represents an unique identifier to a particular entry in the [`Arena`] of
/// type `T`.
pub struct ID<T: ?Sized> {
    index: u32,
    generation: u32,

    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> ID<T> {
    /// Creates a new [`ID`] with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation, _marker: PhantomData }
    }

    /// Returns the slot index of the [`ID`].
    #[must_use]
    pub const fn index(&self) -> u32 { self.index }

    /// Returns the generation of the slot at the time the [`ID`] was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 { self.generation }
}

impl<T: ?Sized> Debug for ID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID({}#{})", self.index, self.generation)
    }
}

impl<T: ?Sized> Clone for ID<T> {
    fn clone(&self) -> Self { *self }
}

impl<T: ?Sized> Copy for ID<T> {}

impl<T: ?Sized> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T: ?Sized> Eq for ID<T> {}

impl<T: ?Sized> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index
            .cmp(&other.index)
            .then(self.generation.cmp(&other.generation))
    }
}

impl<T: ?Sized> Hash for ID<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

/// Represents a collection of items of type `T` that can be referenced by an
/// [`ID`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), len: 0 }
    }
}

impl<T> Arena<T> {
    /// Creates a new empty [`Arena`].
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the number of live items in the [`Arena`].
    #[must_use]
    pub const fn len(&self) -> usize { self.len }

    /// Returns `true` if the [`Arena`] contains no live items.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Inserts a new item into the [`Arena`] and returns its ID.
    ///
    /// Slots freed by [`Arena::remove`] are reused; the returned ID carries
    /// the slot's new generation.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` slots.
    pub fn insert(&mut self, item: T) -> ID<T> {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.item.is_none());
            slot.item = Some(item);

            return ID::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len())
            .expect("arena exceeded the maximum number of slots");
        self.slots.push(Slot { generation: 0, item: Some(item) });

        ID::new(index, 0)
    }

    /// Inserts a new item into the [`Arena`] by invoking the given closure with
    /// the new ID for that item.
    pub fn insert_with(&mut self, f: impl FnOnce(ID<T>) -> T) -> ID<T> {
        let id = self.next_id();
        let inserted = self.insert(f(id));
        debug_assert_eq!(id, inserted);

        inserted
    }

    /// Returns the ID that the next call to [`Arena::insert`] will return.
    #[must_use]
    pub fn next_id(&self) -> ID<T> {
        self.free.last().map_or_else(
            || {
                ID::new(
                    u32::try_from(self.slots.len()).unwrap_or(u32::MAX),
                    0,
                )
            },
            |index| ID::new(*index, self.slots[*index as usize].generation),
        )
    }

    /// Removes the item with the given ID and returns it.
    ///
    /// The slot's generation is advanced, so the given ID (and every copy of
    /// it) is no longer valid afterwards.
    #[must_use = "the removed item is returned"]
    pub fn remove(&mut self, id: ID<T>) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;

        if slot.generation != id.generation {
            return None;
        }

        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;

        Some(item)
    }

    /// Returns a reference to the item in the [`Arena`] with the given ID.
    #[must_use]
    pub fn get(&self, id: ID<T>) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    /// Returns a mutable reference to the item in the [`Arena`] with the given
    /// ID.
    #[must_use]
    pub fn get_mut(&mut self, id: ID<T>) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    /// Checks if the [`Arena`] contains a live item with the given ID.
    #[must_use]
    pub fn contains_id(&self, id: ID<T>) -> bool { self.get(id).is_some() }

    /// Returns an iterator over the live items in the [`Arena`] with their IDs
    /// in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ID<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let index = u32::try_from(index).ok()?;
            slot.item
                .as_ref()
                .map(|item| (ID::new(index, slot.generation), item))
        })
    }

    /// Returns an iterator over the live items in the [`Arena`].
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.item.as_ref())
    }

    /// Returns an iterator over the IDs of the live items in the [`Arena`].
    pub fn ids(&self) -> impl Iterator<Item = ID<T>> + '_ {
        self.iter().map(|(id, _)| id)
    }
}

impl<T> Index<ID<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: ID<T>) -> &Self::Output {
        self.get(id).expect("invalid or stale arena ID")
    }
}

impl<T> IndexMut<ID<T>> for Arena<T> {
    fn index_mut(&mut self, id: ID<T>) -> &mut Self::Output {
        self.get_mut(id).expect("invalid or stale arena ID")
    }
}
