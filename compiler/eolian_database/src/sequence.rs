//! Contains the [`Sequence`], the single-pass cursor returned by every
//! enumeration in the object model.

use std::{fmt::Debug, iter::FusedIterator};

use eolian_arena::ID;

use crate::{
    database::Database,
    view::{Entity, View},
};

/// A lazy, single-pass sequence of items.
///
/// The underlying source is released as soon as the sequence reports its end
/// or is dropped; once exhausted the sequence keeps yielding `None`.
pub struct Sequence<'a, T> {
    source: Option<Box<dyn Iterator<Item = T> + 'a>>,
}

impl<'a, T> Sequence<'a, T> {
    /// Creates a new [`Sequence`] that draws its items from `source`.
    pub fn new(source: impl Iterator<Item = T> + 'a) -> Self {
        Self { source: Some(Box::new(source)) }
    }

    /// Creates a [`Sequence`] that yields nothing.
    #[must_use]
    pub fn empty() -> Self { Self { source: None } }

    /// Returns `true` once the sequence has reported its end or has been
    /// released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool { self.source.is_none() }

    /// Releases the underlying source early. The sequence yields nothing
    /// afterwards.
    pub fn release(&mut self) { self.source = None; }
}

impl<'db, T: Entity> Sequence<'db, View<'db, T>> {
    /// Creates a sequence of views over the given handles. Handles that no
    /// longer resolve are skipped.
    pub(crate) fn of_ids(database: &'db Database, ids: &'db [ID<T>]) -> Self {
        Self::new(ids.iter().filter_map(move |id| View::new(database, *id)))
    }
}

impl<T> Iterator for Sequence<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.as_mut()?.next();

        if item.is_none() {
            self.source = None;
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.as_ref().map_or((0, Some(0)), |source| source.size_hint())
    }
}

impl<T> FusedIterator for Sequence<'_, T> {}

impl<T> Default for Sequence<'_, T> {
    fn default() -> Self { Self::empty() }
}

impl<T> Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, rc::Rc};

    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::Sequence;

    struct Tracked<I> {
        inner: I,
        drops: Rc<Cell<usize>>,
    }

    impl<I: Iterator> Iterator for Tracked<I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<Self::Item> { self.inner.next() }
    }

    impl<I> Drop for Tracked<I> {
        fn drop(&mut self) { self.drops.set(self.drops.get() + 1); }
    }

    #[test]
    fn source_released_exactly_once_at_end() {
        let drops = Rc::new(Cell::new(0));
        let mut sequence = Sequence::new(Tracked {
            inner: [1, 2].into_iter(),
            drops: drops.clone(),
        });

        assert_eq!(sequence.next(), Some(1));
        assert_eq!(sequence.next(), Some(2));
        assert_eq!(drops.get(), 0);

        assert_eq!(sequence.next(), None);
        assert_eq!(drops.get(), 1);
        assert!(sequence.is_exhausted());

        assert_eq!(sequence.next(), None);
        drop(sequence);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn source_released_on_early_drop() {
        let drops = Rc::new(Cell::new(0));
        let mut sequence = Sequence::new(Tracked {
            inner: 0..10,
            drops: drops.clone(),
        });

        assert_eq!(sequence.next(), Some(0));
        drop(sequence);

        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn empty_sequence() {
        let mut sequence = Sequence::<u8>::empty();

        assert!(sequence.is_exhausted());
        assert_eq!(sequence.next(), None);
        assert_eq!(sequence.size_hint(), (0, Some(0)));
    }

    #[test]
    fn explicit_release() {
        let mut sequence = Sequence::new(0..3);
        sequence.release();

        assert_eq!(sequence.next(), None);
    }

    proptest! {
        #[test]
        fn stays_exhausted(
            items in proptest::collection::vec(0u32..100, 0..16),
            extra in 1usize..8,
        ) {
            let mut sequence = Sequence::new(items.clone().into_iter());

            let collected = sequence.by_ref().collect::<Vec<_>>();
            prop_assert_eq!(collected, items);
            prop_assert!(sequence.is_exhausted());

            for _ in 0..extra {
                prop_assert_eq!(sequence.next(), None);
            }
        }
    }
}
