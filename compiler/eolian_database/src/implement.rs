//! Contains the [`Implement`], a record that a class provides (or overrides)
//! a function.

use std::sync::Arc;

use eolian_arena::ID;
use getset::CopyGetters;

use crate::{
    class::{Class, ClassID},
    documentation::{Documentation, DocumentationData},
    function::{Function, FunctionID, FunctionType},
    view::View,
};

/// The flags of one accessor of an implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, CopyGetters)]
pub struct ImplementFlags {
    /// Whether the body is generated automatically.
    #[get_copy = "pub"]
    pub(crate) auto: bool,

    /// Whether the body is empty.
    #[get_copy = "pub"]
    pub(crate) empty: bool,

    /// Whether no body exists at all.
    #[get_copy = "pub"]
    pub(crate) pure_virtual: bool,
}

/// The record backing an [`Implement`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementData {
    pub(crate) full_name: Arc<str>,
    pub(crate) class: ClassID,
    pub(crate) implementing_class: ClassID,
    pub(crate) function: FunctionID,
    pub(crate) is_prop_get: bool,
    pub(crate) is_prop_set: bool,
    pub(crate) getter: ImplementFlags,
    pub(crate) setter: ImplementFlags,
    pub(crate) documentation: Option<ID<DocumentationData>>,
    pub(crate) getter_documentation: Option<ID<DocumentationData>>,
    pub(crate) setter_documentation: Option<ID<DocumentationData>>,
}

/// The handle of a stored implement.
pub type ImplementID = ID<ImplementData>;

/// A class's provision of a function, either its own or an inherited one.
pub type Implement<'db> = View<'db, ImplementData>;

impl<'db> View<'db, ImplementData> {
    /// Returns the dotted name: the declaring class followed by the function
    /// name, such as `Efl.Object.constructor`.
    #[must_use]
    pub fn full_name(&self) -> &'db str { &self.record().full_name }

    /// Returns the class that declares the implemented function.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.resolve(self.record().class)
    }

    /// Returns the class that lists the implement.
    #[must_use]
    pub fn implementing_class(&self) -> Option<Class<'db>> {
        self.resolve(self.record().implementing_class)
    }

    /// Returns the implemented function.
    ///
    /// With `PropGet` or `PropSet` the function is only returned when the
    /// implement covers that accessor.
    #[must_use]
    pub fn function(&self, ftype: FunctionType) -> Option<Function<'db>> {
        let covered = match ftype {
            FunctionType::PropGet => self.record().is_prop_get,
            FunctionType::PropSet => self.record().is_prop_set,
            _ => true,
        };

        covered
            .then(|| self.resolve(self.record().function))
            .flatten()
    }

    /// Returns the documentation of the selected accessor: the getter or
    /// setter block for `PropGet`/`PropSet`, the common block otherwise.
    #[must_use]
    pub fn documentation(
        &self,
        ftype: FunctionType,
    ) -> Option<Documentation<'db>> {
        let record = self.record();
        let id = match ftype {
            FunctionType::PropGet => record.getter_documentation,
            FunctionType::PropSet => record.setter_documentation,
            _ => record.documentation,
        };

        id.and_then(|id| self.resolve(id))
    }

    fn flags(&self, ftype: FunctionType) -> ImplementFlags {
        if ftype == FunctionType::PropSet {
            self.record().setter
        } else {
            self.record().getter
        }
    }

    /// Whether the selected accessor is generated automatically.
    #[must_use]
    pub fn is_auto(&self, ftype: FunctionType) -> bool {
        self.flags(ftype).auto
    }

    /// Whether the selected accessor has an empty body.
    #[must_use]
    pub fn is_empty(&self, ftype: FunctionType) -> bool {
        self.flags(ftype).empty
    }

    /// Whether the selected accessor has no body.
    #[must_use]
    pub fn is_pure_virtual(&self, ftype: FunctionType) -> bool {
        self.flags(ftype).pure_virtual
    }

    /// Whether the implement covers the getter of a property.
    #[must_use]
    pub fn is_prop_get(&self) -> bool { self.record().is_prop_get }

    /// Whether the implement covers the setter of a property.
    #[must_use]
    pub fn is_prop_set(&self) -> bool { self.record().is_prop_set }
}
