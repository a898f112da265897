//! Contains the [`Documentation`] attached to classes, functions and the other
//! documented objects.

use std::sync::Arc;

use crate::{sequence::Sequence, view::View};

/// The record backing a [`Documentation`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationData {
    pub(crate) summary: Arc<str>,
    pub(crate) description: Option<Arc<str>>,
    pub(crate) since: Option<Arc<str>>,
}

/// A documentation block: a mandatory summary with an optional description
/// and an optional version marker.
pub type Documentation<'db> = View<'db, DocumentationData>;

impl<'db> View<'db, DocumentationData> {
    /// Returns the one-line summary.
    #[must_use]
    pub fn summary(&self) -> &'db str { &self.record().summary }

    /// Returns the long description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&'db str> {
        self.record().description.as_deref()
    }

    /// Returns the version the documented object appeared in, if recorded.
    #[must_use]
    pub fn since(&self) -> Option<&'db str> { self.record().since.as_deref() }

    /// Splits the description into paragraphs separated by blank lines.
    ///
    /// Lines are trimmed; a paragraph keeps its inner line breaks.
    #[must_use]
    pub fn paragraphs(&self) -> Sequence<'db, String> {
        let Some(description) = self.description() else {
            return Sequence::empty();
        };

        let mut lines = description.lines().map(str::trim).peekable();

        Sequence::new(std::iter::from_fn(move || {
            while lines.next_if(|line| line.is_empty()).is_some() {}

            let mut paragraph = Vec::new();
            while let Some(line) = lines.next_if(|line| !line.is_empty()) {
                paragraph.push(line);
            }

            (!paragraph.is_empty()).then(|| paragraph.join("\n"))
        }))
    }
}
