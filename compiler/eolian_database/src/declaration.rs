//! Contains the [`Declaration`], the entry that reserves a dotted name for a
//! class, a type declaration or a variable.

use std::sync::Arc;

use enum_as_inner::EnumAsInner;
use eolian_arena::ID;
use strum_macros::EnumIter;

use crate::{
    class::{Class, ClassID},
    typedecl::{Typedecl, TypedeclID},
    variable::{Variable, VariableID},
    view::View,
};

/// The kind of object a [`Declaration`] names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum DeclarationType {
    #[default]
    Unknown = 0,
    Class = 1,
    Alias = 2,
    Struct = 3,
    Enum = 4,
    Var = 5,
}

/// The object a declaration refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum DeclarationTarget {
    Class(ClassID),
    Typedecl(TypedeclID),
    Variable(VariableID),
}

/// The record backing a [`Declaration`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationData {
    pub(crate) full_name: Arc<str>,
    pub(crate) file: Arc<str>,
    pub(crate) declaration_type: DeclarationType,
    pub(crate) target: DeclarationTarget,
}

/// The handle of a stored declaration.
pub type DeclarationID = ID<DeclarationData>;

/// A named entry of the global declaration namespace.
pub type Declaration<'db> = View<'db, DeclarationData>;

impl<'db> View<'db, DeclarationData> {
    /// Returns the kind of object declared.
    #[must_use]
    pub fn declaration_type(&self) -> DeclarationType {
        self.record().declaration_type
    }

    /// Returns the declared dotted name.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().full_name }

    /// Returns the name of the declaring file.
    #[must_use]
    pub fn file(&self) -> &'db str { &self.record().file }

    /// Returns the declared class, if this declares one.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.record().target.as_class().and_then(|id| self.resolve(*id))
    }

    /// Returns the declared struct, enum or alias, if this declares one.
    #[must_use]
    pub fn typedecl(&self) -> Option<Typedecl<'db>> {
        self.record().target.as_typedecl().and_then(|id| self.resolve(*id))
    }

    /// Returns the declared variable, if this declares one.
    #[must_use]
    pub fn variable(&self) -> Option<Variable<'db>> {
        self.record().target.as_variable().and_then(|id| self.resolve(*id))
    }
}
