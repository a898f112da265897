//! Contains the named constants and globals.

use std::sync::Arc;

use eolian_arena::ID;
use strum_macros::EnumIter;

use crate::{
    documentation::{Documentation, DocumentationData},
    expression::{Expression, ExpressionID},
    intern,
    r#type::{Type, TypeID},
    sequence::Sequence,
    view::View,
};

/// The kind of a [`Variable`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum VariableType {
    #[default]
    Unknown = 0,
    Constant = 1,
    Global = 2,
}

/// The record backing a [`Variable`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableData {
    pub(crate) full_name: Arc<str>,
    pub(crate) file: Arc<str>,
    pub(crate) variable_type: VariableType,
    pub(crate) base_type: TypeID,
    pub(crate) value: Option<ExpressionID>,
    pub(crate) is_extern: bool,
    pub(crate) documentation: Option<ID<DocumentationData>>,
}

/// The handle of a stored variable.
pub type VariableID = ID<VariableData>;

/// A named constant or global.
pub type Variable<'db> = View<'db, VariableData>;

impl<'db> View<'db, VariableData> {
    /// Returns whether this is a constant or a global.
    #[must_use]
    pub fn variable_type(&self) -> VariableType { self.record().variable_type }

    /// Returns the unqualified name.
    #[must_use]
    pub fn name(&self) -> &'db str { intern::short_name(self.full_name()) }

    /// Returns the dotted name.
    #[must_use]
    pub fn full_name(&self) -> &'db str { &self.record().full_name }

    /// Returns the namespace segments, outermost first.
    #[must_use]
    pub fn namespaces(&self) -> Sequence<'db, &'db str> {
        Sequence::new(intern::namespaces(self.full_name()))
    }

    /// Returns the name of the declaring file.
    #[must_use]
    pub fn file(&self) -> &'db str { &self.record().file }

    /// Returns the declared type.
    #[must_use]
    pub fn base_type(&self) -> Option<Type<'db>> {
        self.resolve(self.record().base_type)
    }

    /// Returns the initializer. Always present for constants.
    #[must_use]
    pub fn value(&self) -> Option<Expression<'db>> {
        self.record().value.and_then(|id| self.resolve(id))
    }

    /// Whether the variable is provided by outside C code.
    #[must_use]
    pub fn is_extern(&self) -> bool { self.record().is_extern }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }
}
