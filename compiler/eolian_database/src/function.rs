//! Contains the [`Function`]s declared by classes and function pointer types,
//! together with their [`Parameter`]s.

use std::sync::Arc;

use eolian_arena::ID;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::{
    class::{Class, ClassID},
    documentation::{Documentation, DocumentationData},
    expression::{Expression, ExpressionID},
    implement::{Implement, ImplementData},
    intern,
    r#type::{Type, TypeID},
    sequence::Sequence,
    view::View,
};

/// The kind of a [`Function`], also used to select one accessor of a
/// property.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum FunctionType {
    #[default]
    Unresolved = 0,
    Property = 1,
    PropSet = 2,
    PropGet = 3,
    Method = 4,
    FunctionPointer = 5,
}

/// The visibility of a function accessor or an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[allow(missing_docs)]
pub enum ObjectScope {
    Unknown = 0,
    #[default]
    Public = 1,
    Private = 2,
    Protected = 3,
}

/// The direction a [`Parameter`] passes data in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[allow(missing_docs)]
pub enum ParameterDirection {
    Unknown = 0,
    #[default]
    In = 1,
    Out = 2,
    InOut = 3,
}

/// The per-accessor part of a function: a method has one, a property has a
/// getter, a setter or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct AccessorData {
    pub(crate) scope: ObjectScope,
    pub(crate) return_type: Option<TypeID>,
    pub(crate) return_default: Option<ExpressionID>,
    pub(crate) return_documentation: Option<ID<DocumentationData>>,
    pub(crate) return_warn_unused: bool,
    pub(crate) legacy: Option<Arc<str>>,
    pub(crate) legacy_only: bool,
    pub(crate) keys: Vec<ParameterID>,
    pub(crate) values: Vec<ParameterID>,
}

/// The record backing a [`Function`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionData {
    pub(crate) name: Arc<str>,
    pub(crate) class: Option<ClassID>,
    pub(crate) function_type: FunctionType,
    pub(crate) is_class: bool,
    pub(crate) is_beta: bool,
    pub(crate) object_is_const: bool,
    pub(crate) parameters: Vec<ParameterID>,
    pub(crate) method: Option<AccessorData>,
    pub(crate) getter: Option<AccessorData>,
    pub(crate) setter: Option<AccessorData>,
    pub(crate) implement: Option<ID<ImplementData>>,
}

/// The handle of a stored function.
pub type FunctionID = ID<FunctionData>;

/// A method, a property or the signature of a function pointer type.
pub type Function<'db> = View<'db, FunctionData>;

impl<'db> View<'db, FunctionData> {
    /// Returns the name of the function. For function pointers this is the
    /// dotted name of the pointer type.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the kind of the function.
    #[must_use]
    pub fn function_type(&self) -> FunctionType { self.record().function_type }

    /// Narrows `ftype` to a concrete accessor kind. `Unresolved` and
    /// `Property` select the function's own kind, the getter for a property
    /// with both accessors.
    fn effective_type(&self, ftype: FunctionType) -> FunctionType {
        match (ftype, self.function_type()) {
            (
                FunctionType::Unresolved | FunctionType::Property,
                FunctionType::Property,
            ) => FunctionType::PropGet,
            (FunctionType::Unresolved | FunctionType::Property, own) => own,
            (ftype, _) => ftype,
        }
    }

    fn accessor(&self, ftype: FunctionType) -> Option<&'db AccessorData> {
        let record = self.record();

        match self.effective_type(ftype) {
            FunctionType::Method | FunctionType::FunctionPointer => {
                record.method.as_ref()
            }
            FunctionType::PropGet => record.getter.as_ref(),
            FunctionType::PropSet => record.setter.as_ref(),
            FunctionType::Unresolved | FunctionType::Property => None,
        }
    }

    /// Returns the visibility of the selected accessor,
    /// [`ObjectScope::Unknown`] if the function has no such accessor.
    #[must_use]
    pub fn scope(&self, ftype: FunctionType) -> ObjectScope {
        self.accessor(ftype).map_or(ObjectScope::Unknown, |accessor| {
            accessor.scope
        })
    }

    /// Returns the visibility of the method.
    #[must_use]
    pub fn method_scope(&self) -> ObjectScope {
        self.scope(FunctionType::Method)
    }

    /// Returns the visibility of the getter.
    #[must_use]
    pub fn getter_scope(&self) -> ObjectScope {
        self.scope(FunctionType::PropGet)
    }

    /// Returns the visibility of the setter.
    #[must_use]
    pub fn setter_scope(&self) -> ObjectScope {
        self.scope(FunctionType::PropSet)
    }

    /// Returns the explicit legacy C name of the selected accessor.
    #[must_use]
    pub fn legacy(&self, ftype: FunctionType) -> Option<&'db str> {
        self.accessor(ftype)
            .and_then(|accessor| accessor.legacy.as_deref())
            .filter(|legacy| *legacy != "null")
    }

    /// Whether the selected accessor only exists in the legacy API.
    #[must_use]
    pub fn is_legacy_only(&self, ftype: FunctionType) -> bool {
        self.accessor(ftype).is_some_and(|accessor| accessor.legacy_only)
    }

    /// Whether the function is a class function.
    #[must_use]
    pub fn is_class(&self) -> bool { self.record().is_class }

    /// Whether the function is marked beta.
    #[must_use]
    pub fn is_beta(&self) -> bool { self.record().is_beta }

    /// Whether the function does not modify the object.
    #[must_use]
    pub fn object_is_const(&self) -> bool { self.record().object_is_const }

    /// Returns the declaring class, `None` for function pointers.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.record().class.and_then(|id| self.resolve(id))
    }

    /// Whether `class` lists this function among its constructors.
    #[must_use]
    pub fn is_constructor(&self, class: &Class<'_>) -> bool {
        class.constructors().any(|constructor| {
            constructor.function().is_some_and(|function| {
                function.id() == self.id()
                    && std::ptr::eq(function.database(), self.database())
            })
        })
    }

    /// Returns the parameters of a method or a function pointer.
    #[must_use]
    pub fn parameters(&self) -> Sequence<'db, Parameter<'db>> {
        Sequence::of_ids(self.database(), &self.record().parameters)
    }

    /// Returns the keys of the selected property accessor.
    #[must_use]
    pub fn property_keys(
        &self,
        ftype: FunctionType,
    ) -> Sequence<'db, Parameter<'db>> {
        self.accessor(ftype).map_or_else(Sequence::empty, |accessor| {
            Sequence::of_ids(self.database(), &accessor.keys)
        })
    }

    /// Returns the values of the selected property accessor.
    #[must_use]
    pub fn property_values(
        &self,
        ftype: FunctionType,
    ) -> Sequence<'db, Parameter<'db>> {
        self.accessor(ftype).map_or_else(Sequence::empty, |accessor| {
            Sequence::of_ids(self.database(), &accessor.values)
        })
    }

    /// Returns the return type of the selected accessor.
    #[must_use]
    pub fn return_type(&self, ftype: FunctionType) -> Option<Type<'db>> {
        self.accessor(ftype)
            .and_then(|accessor| accessor.return_type)
            .and_then(|id| self.resolve(id))
    }

    /// Returns the value returned on error by the selected accessor.
    #[must_use]
    pub fn return_default_value(
        &self,
        ftype: FunctionType,
    ) -> Option<Expression<'db>> {
        self.accessor(ftype)
            .and_then(|accessor| accessor.return_default)
            .and_then(|id| self.resolve(id))
    }

    /// Returns the documentation of the return value of the selected
    /// accessor.
    #[must_use]
    pub fn return_documentation(
        &self,
        ftype: FunctionType,
    ) -> Option<Documentation<'db>> {
        self.accessor(ftype)
            .and_then(|accessor| accessor.return_documentation)
            .and_then(|id| self.resolve(id))
    }

    /// Whether ignoring the return value of the selected accessor is
    /// reported by the C compiler.
    #[must_use]
    pub fn return_is_warn_unused(&self, ftype: FunctionType) -> bool {
        self.accessor(ftype).is_some_and(|accessor| accessor.return_warn_unused)
    }

    /// Whether the property has a getter.
    #[must_use]
    pub fn prop_readable(&self) -> bool { self.record().getter.is_some() }

    /// Whether the property has a setter.
    #[must_use]
    pub fn prop_writable(&self) -> bool { self.record().setter.is_some() }

    /// Returns the implicit implement created for the function on its own
    /// class.
    #[must_use]
    pub fn implement(&self) -> Option<Implement<'db>> {
        self.record().implement.and_then(|id| self.resolve(id))
    }

    /// Returns the C name of the selected accessor.
    ///
    /// The name is the class's eo prefix (or the lower-cased C spelling of
    /// the class name), the function name and `_get`/`_set` for property
    /// accessors. With `legacy` the explicit legacy name is used when
    /// declared, the legacy prefix otherwise.
    #[must_use]
    pub fn full_c_name(&self, ftype: FunctionType, legacy: bool) -> String {
        let Some(class) = self.class() else {
            return intern::c_spelling(self.name());
        };

        let suffix = match self.effective_type(ftype) {
            FunctionType::PropGet => "_get",
            FunctionType::PropSet => "_set",
            _ => "",
        };

        if legacy {
            if let Some(name) = self.legacy(ftype) {
                return format!("{name}{suffix}");
            }
        }

        let prefix = if legacy {
            class.legacy_prefix()
        } else {
            class.eo_prefix()
        }
        .map_or_else(
            || intern::c_spelling(class.full_name()).to_lowercase(),
            ToOwned::to_owned,
        );

        format!("{prefix}_{}{suffix}", self.name())
    }
}

/// The record backing a [`Parameter`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    pub(crate) name: Arc<str>,
    pub(crate) direction: ParameterDirection,
    pub(crate) parameter_type: TypeID,
    pub(crate) default_value: Option<ExpressionID>,
    pub(crate) documentation: Option<ID<DocumentationData>>,
    pub(crate) is_nonull: bool,
    pub(crate) is_nullable: bool,
    pub(crate) is_optional: bool,
}

/// The handle of a stored parameter.
pub type ParameterID = ID<ParameterData>;

/// A parameter of a method, a property key or value, or a function pointer
/// parameter.
pub type Parameter<'db> = View<'db, ParameterData>;

impl<'db> View<'db, ParameterData> {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the direction of the parameter.
    #[must_use]
    pub fn direction(&self) -> ParameterDirection { self.record().direction }

    /// Returns the type of the parameter.
    #[must_use]
    pub fn parameter_type(&self) -> Option<Type<'db>> {
        self.resolve(self.record().parameter_type)
    }

    /// Returns the default value, if declared.
    #[must_use]
    pub fn default_value(&self) -> Option<Expression<'db>> {
        self.record().default_value.and_then(|id| self.resolve(id))
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }

    /// Whether the parameter may never be null.
    #[must_use]
    pub fn is_nonull(&self) -> bool { self.record().is_nonull }

    /// Whether the parameter may be null.
    #[must_use]
    pub fn is_nullable(&self) -> bool { self.record().is_nullable }

    /// Whether the parameter may be omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool { self.record().is_optional }
}
