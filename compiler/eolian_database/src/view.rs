//! Contains the [`View`], a cheap copyable handle that reads one entity of the
//! [`Database`].
//!
//! Every object of the model (a class, a function, a type, ...) is stored as a
//! record in one of the database's arenas. A [`View`] pairs the database with
//! the record's [`ID`] and is the only way the records are exposed; the
//! accessors of each kind of object live on `View<'db, Record>`.

use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

use eolian_arena::{Arena, ID};
use thiserror::Error;

use crate::database::{Database, Storage};

mod sealed {
    pub trait Sealed {}
}

/// Implemented by every record kind stored in the [`Database`].
pub trait Entity: Sized + 'static + sealed::Sealed {
    /// The human readable name of the kind of object, used in diagnostics.
    const KIND: &'static str;

    #[doc(hidden)]
    fn arena(storage: &Storage) -> &Arena<Self>;

    #[doc(hidden)]
    fn arena_mut(storage: &mut Storage) -> &mut Arena<Self>;
}

macro_rules! implements_entity {
    ($($record:ty => $field:ident, $kind:literal;)*) => {
        $(
            impl sealed::Sealed for $record {}

            impl Entity for $record {
                const KIND: &'static str = $kind;

                fn arena(storage: &Storage) -> &Arena<Self> { &storage.$field }

                fn arena_mut(storage: &mut Storage) -> &mut Arena<Self> {
                    &mut storage.$field
                }
            }
        )*
    };
}

implements_entity! {
    crate::class::ClassData => classes, "class";
    crate::class::PartData => parts, "part";
    crate::class::ConstructorData => constructors, "constructor";
    crate::class::EventData => events, "event";
    crate::function::FunctionData => functions, "function";
    crate::function::ParameterData => parameters, "parameter";
    crate::implement::ImplementData => implements, "implement";
    crate::r#type::TypeData => types, "type";
    crate::typedecl::TypedeclData => typedecls, "typedecl";
    crate::typedecl::StructFieldData => struct_fields, "struct field";
    crate::typedecl::EnumFieldData => enum_fields, "enum field";
    crate::expression::ExpressionData => expressions, "expression";
    crate::variable::VariableData => variables, "variable";
    crate::declaration::DeclarationData => declarations, "declaration";
    crate::documentation::DocumentationData => documentation, "documentation";
}

/// The error returned when a handle does not refer to a live object, either
/// because the object was rolled back or because the handle belongs to another
/// database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the {kind} handle {index}#{generation} is invalid or stale")]
#[allow(missing_docs)]
pub struct InvalidHandleError {
    pub kind: &'static str,
    pub index: u32,
    pub generation: u32,
}

impl InvalidHandleError {
    pub(crate) fn of<T: Entity>(id: ID<T>) -> Self {
        Self { kind: T::KIND, index: id.index(), generation: id.generation() }
    }
}

/// A read-only handle to one object of the [`Database`].
///
/// Views compare and hash by their identity (the database they belong to and
/// the object's [`ID`]), never by content.
pub struct View<'db, T> {
    database: &'db Database,
    id: ID<T>,
    record: &'db T,
}

impl<'db, T: Entity> View<'db, T> {
    /// Resolves `id` in `database`, returning `None` if it is stale.
    pub(crate) fn new(database: &'db Database, id: ID<T>) -> Option<Self> {
        T::arena(database.storage())
            .get(id)
            .map(|record| Self { database, id, record })
    }

    pub(crate) fn record(&self) -> &'db T { self.record }

    /// Resolves another handle against the same database.
    pub(crate) fn resolve<U: Entity>(&self, id: ID<U>) -> Option<View<'db, U>> {
        View::new(self.database, id)
    }

    /// Returns the [`ID`] of the object.
    #[must_use]
    pub fn id(&self) -> ID<T> { self.id }

    /// Returns the [`Database`] the object belongs to.
    #[must_use]
    pub fn database(&self) -> &'db Database { self.database }
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for View<'_, T> {}

impl<T> PartialEq for View<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.database, other.database)
    }
}

impl<T> Eq for View<'_, T> {}

impl<T> Hash for View<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.database, state);
        self.id.hash(state);
    }
}

impl<T: Entity> Debug for View<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "View<{}>({}#{})",
            T::KIND,
            self.id.index(),
            self.id.generation()
        )
    }
}
