//! Contains the [`Interner`], the shared store of immutable names.

use std::{collections::HashSet, sync::Arc};

/// Deduplicates text values so that every entity naming the same thing shares
/// one immutable allocation.
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    /// Creates a new empty [`Interner`].
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the shared copy of `text`, allocating it on first use.
    pub fn intern(&mut self, text: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(text) {
            return existing.clone();
        }

        let shared: Arc<str> = Arc::from(text);
        self.strings.insert(shared.clone());

        shared
    }

    /// Returns the shared copy of `text` if it has been interned before.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Arc<str>> {
        self.strings.get(text).cloned()
    }

    /// Returns the number of distinct strings.
    #[must_use]
    pub fn len(&self) -> usize { self.strings.len() }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.strings.is_empty() }
}

/// Returns the last segment of a dotted name such as `Efl.Ui.Button`.
#[must_use]
pub fn short_name(full_name: &str) -> &str {
    full_name.rsplit_once('.').map_or(full_name, |(_, name)| name)
}

/// Returns the namespace segments of a dotted name, outermost first.
pub fn namespaces(full_name: &str) -> impl Iterator<Item = &str> {
    full_name
        .rsplit_once('.')
        .map(|(namespaces, _)| namespaces.split('.'))
        .into_iter()
        .flatten()
}

/// Converts a dotted name into its C spelling, `Efl.Ui.Button` becoming
/// `Efl_Ui_Button`.
#[must_use]
pub fn c_spelling(full_name: &str) -> String { full_name.replace('.', "_") }
