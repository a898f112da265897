//! Contains the [`Class`] and the members that only exist inside one: parts,
//! constructors and events.

use std::{collections::HashSet, sync::Arc};

use eolian_arena::ID;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::{
    documentation::{Documentation, DocumentationData},
    function::{Function, FunctionID, FunctionType, ObjectScope},
    implement::{Implement, ImplementData},
    intern,
    r#type::{Type, TypeID},
    sequence::Sequence,
    view::View,
};

/// The kind of a [`Class`].
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
pub enum ClassType {
    Unknown = 0,
    #[default]
    Regular = 1,
    Abstract = 2,
    Mixin = 3,
    Interface = 4,
}

impl ClassType {
    /// Returns the suffix of the C names derived from a class of this kind.
    #[must_use]
    pub fn c_suffix(self) -> &'static str {
        match self {
            Self::Mixin => "MIXIN",
            Self::Interface => "INTERFACE",
            Self::Unknown | Self::Regular | Self::Abstract => "CLASS",
        }
    }
}

/// The record backing a [`Class`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub(crate) full_name: Arc<str>,
    pub(crate) file: Arc<str>,
    pub(crate) class_type: ClassType,
    pub(crate) documentation: Option<ID<DocumentationData>>,
    pub(crate) legacy_prefix: Option<Arc<str>>,
    pub(crate) eo_prefix: Option<Arc<str>>,
    pub(crate) event_prefix: Option<Arc<str>>,
    pub(crate) data_type: Option<Arc<str>>,
    pub(crate) ctor_enable: bool,
    pub(crate) dtor_enable: bool,
    pub(crate) inherits: Vec<ClassID>,
    pub(crate) functions: Vec<FunctionID>,
    pub(crate) implements: Vec<ID<ImplementData>>,
    pub(crate) constructors: Vec<ID<ConstructorData>>,
    pub(crate) events: Vec<ID<EventData>>,
    pub(crate) parts: Vec<ID<PartData>>,
}

impl ClassData {
    pub(crate) fn new(
        full_name: Arc<str>,
        file: Arc<str>,
        class_type: ClassType,
    ) -> Self {
        Self {
            full_name,
            file,
            class_type,
            documentation: None,
            legacy_prefix: None,
            eo_prefix: None,
            event_prefix: None,
            data_type: None,
            ctor_enable: false,
            dtor_enable: false,
            inherits: Vec::new(),
            functions: Vec::new(),
            implements: Vec::new(),
            constructors: Vec::new(),
            events: Vec::new(),
            parts: Vec::new(),
        }
    }
}

/// The handle of a stored class.
pub type ClassID = ID<ClassData>;

/// A class, abstract class, mixin or interface.
pub type Class<'db> = View<'db, ClassData>;

impl<'db> View<'db, ClassData> {
    /// Returns the unqualified name.
    #[must_use]
    pub fn name(&self) -> &'db str { intern::short_name(self.full_name()) }

    /// Returns the dotted name, such as `Efl.Loop`.
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

    /// Returns the kind of the class.
    #[must_use]
    pub fn class_type(&self) -> ClassType { self.record().class_type }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }

    /// Returns the prefix of the legacy C API, if declared.
    #[must_use]
    pub fn legacy_prefix(&self) -> Option<&'db str> {
        self.record().legacy_prefix.as_deref()
    }

    /// Returns the prefix of the C function names, if declared.
    #[must_use]
    pub fn eo_prefix(&self) -> Option<&'db str> {
        self.record().eo_prefix.as_deref()
    }

    /// Returns the prefix of the C event names, if declared.
    #[must_use]
    pub fn event_prefix(&self) -> Option<&'db str> {
        self.record().event_prefix.as_deref()
    }

    /// Returns the explicitly declared private data type, if any.
    #[must_use]
    pub fn data_type(&self) -> Option<&'db str> {
        self.record().data_type.as_deref()
    }

    /// Whether the class implements a class constructor.
    #[must_use]
    pub fn ctor_enable(&self) -> bool { self.record().ctor_enable }

    /// Whether the class implements a class destructor.
    #[must_use]
    pub fn dtor_enable(&self) -> bool { self.record().dtor_enable }

    /// Returns the directly inherited classes in declaration order.
    #[must_use]
    pub fn inherits(&self) -> Sequence<'db, Self> {
        Sequence::of_ids(self.database(), &self.record().inherits)
    }

    /// Returns every class reachable through inheritance, depth first and
    /// in declaration order, each at most once.
    ///
    /// Inheritance cycles are cut where a class is met again; the class
    /// itself is never part of the result.
    #[must_use]
    pub fn inherits_full(&self) -> Sequence<'db, Self> {
        let mut visited = HashSet::from([self.id()]);
        let mut result = Vec::new();
        let mut stack = vec![self.inherits()];

        while let Some(top) = stack.last_mut() {
            let Some(class) = top.next() else {
                stack.pop();
                continue;
            };

            if visited.insert(class.id()) {
                result.push(class);
                stack.push(class.inherits());
            }
        }

        Sequence::new(result.into_iter())
    }

    /// Returns the first directly inherited class.
    #[must_use]
    pub fn base_class(&self) -> Option<Self> { self.inherits().next() }

    /// Returns the functions of the selected kind in declaration order.
    ///
    /// `Unresolved` selects every function, `Property` every property, and
    /// `PropGet`/`PropSet` the properties that declare that accessor.
    #[must_use]
    pub fn functions(
        &self,
        ftype: FunctionType,
    ) -> Sequence<'db, Function<'db>> {
        Sequence::new(
            Sequence::of_ids(self.database(), &self.record().functions)
                .filter(move |function| matches_kind(function, ftype)),
        )
    }

    /// Returns the methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> Sequence<'db, Function<'db>> {
        self.functions(FunctionType::Method)
    }

    /// Returns the properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> Sequence<'db, Function<'db>> {
        self.functions(FunctionType::Property)
    }

    /// Looks up a function declared by this class. `ftype` narrows the
    /// candidates the same way as in [`Self::functions`].
    #[must_use]
    pub fn function_by_name(
        &self,
        name: &str,
        ftype: FunctionType,
    ) -> Option<Function<'db>> {
        self.functions(ftype).find(|function| function.name() == name)
    }

    /// Returns the implicit implements of the class's own functions
    /// followed by the declared implements.
    #[must_use]
    pub fn implements(&self) -> Sequence<'db, Implement<'db>> {
        Sequence::of_ids(self.database(), &self.record().implements)
    }

    /// Returns the constructors in declaration order.
    #[must_use]
    pub fn constructors(&self) -> Sequence<'db, Constructor<'db>> {
        Sequence::of_ids(self.database(), &self.record().constructors)
    }

    /// Returns the events in declaration order.
    #[must_use]
    pub fn events(&self) -> Sequence<'db, Event<'db>> {
        Sequence::of_ids(self.database(), &self.record().events)
    }

    /// Looks up an event by name.
    #[must_use]
    pub fn event_by_name(&self, name: &str) -> Option<Event<'db>> {
        self.events().find(|event| event.name() == name)
    }

    /// Returns the parts in declaration order.
    #[must_use]
    pub fn parts(&self) -> Sequence<'db, Part<'db>> {
        Sequence::of_ids(self.database(), &self.record().parts)
    }

    /// Returns the C name of the class symbol, such as `EFL_LOOP_CLASS`.
    #[must_use]
    pub fn c_name(&self) -> String {
        format!(
            "{}_{}",
            intern::c_spelling(self.full_name()).to_uppercase(),
            self.class_type().c_suffix()
        )
    }

    /// Returns the name of the C function returning the class, such as
    /// `efl_loop_class_get`.
    #[must_use]
    pub fn c_get_function_name(&self) -> String {
        format!(
            "{}_{}_get",
            intern::c_spelling(self.full_name()).to_lowercase(),
            self.class_type().c_suffix().to_lowercase()
        )
    }

    /// Returns the C type of the private data, such as `Efl_Loop_Data`;
    /// `void` when the declared data type is `null`.
    #[must_use]
    pub fn c_data_type(&self) -> String {
        match self.data_type() {
            Some("null") => "void".to_owned(),
            Some(data_type) => intern::c_spelling(data_type),
            None => format!("{}_Data", intern::c_spelling(self.full_name())),
        }
    }
}

fn matches_kind(function: &Function<'_>, ftype: FunctionType) -> bool {
    let own = function.function_type();
    let is_property = matches!(
        own,
        FunctionType::Property | FunctionType::PropGet | FunctionType::PropSet
    );

    match ftype {
        FunctionType::Unresolved => true,
        FunctionType::Method => own == FunctionType::Method,
        FunctionType::Property => is_property,
        FunctionType::PropGet => is_property && function.prop_readable(),
        FunctionType::PropSet => is_property && function.prop_writable(),
        FunctionType::FunctionPointer => false,
    }
}

/// The record backing a [`Part`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartData {
    pub(crate) name: Arc<str>,
    pub(crate) class: ClassID,
    pub(crate) documentation: Option<ID<DocumentationData>>,
}

/// A named sub-object of a class, typed by another class.
pub type Part<'db> = View<'db, PartData>;

impl<'db> View<'db, PartData> {
    /// Returns the part name.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the class of the part.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.resolve(self.record().class)
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }
}

/// The record backing a [`Constructor`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorData {
    pub(crate) full_name: Arc<str>,
    pub(crate) class: ClassID,
    pub(crate) function: FunctionID,
    pub(crate) is_optional: bool,
}

/// A function that must (or may) be called while constructing an object.
pub type Constructor<'db> = View<'db, ConstructorData>;

impl<'db> View<'db, ConstructorData> {
    /// Returns the dotted name, the class name followed by the function name.
    #[must_use]
    pub fn full_name(&self) -> &'db str { &self.record().full_name }

    /// Returns the class declaring the constructor function.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.resolve(self.record().class)
    }

    /// Returns the constructor function.
    #[must_use]
    pub fn function(&self) -> Option<Function<'db>> {
        self.resolve(self.record().function)
    }

    /// Whether calling the constructor may be skipped.
    #[must_use]
    pub fn is_optional(&self) -> bool { self.record().is_optional }
}

/// The record backing an [`Event`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub(crate) name: Arc<str>,
    pub(crate) class: ClassID,
    pub(crate) event_type: Option<TypeID>,
    pub(crate) documentation: Option<ID<DocumentationData>>,
    pub(crate) scope: ObjectScope,
    pub(crate) is_beta: bool,
    pub(crate) is_hot: bool,
    pub(crate) is_restart: bool,
}

/// An event a class emits.
pub type Event<'db> = View<'db, EventData>;

impl<'db> View<'db, EventData> {
    /// Returns the event name, such as `child,added`.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the C name of the event, such as
    /// `EFL_LOOP_EVENT_CHILD_ADDED`.
    #[must_use]
    pub fn c_name(&self) -> String {
        let prefix = self.class().map_or_else(String::new, |class| {
            class
                .event_prefix()
                .or_else(|| class.eo_prefix())
                .map_or_else(
                    || intern::c_spelling(class.full_name()),
                    ToOwned::to_owned,
                )
        });

        format!("{prefix}_EVENT_{}", self.name().replace(',', "_"))
            .to_uppercase()
    }

    /// Returns the type of the event payload, if any.
    #[must_use]
    pub fn event_type(&self) -> Option<Type<'db>> {
        self.record().event_type.and_then(|id| self.resolve(id))
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }

    /// Returns the visibility of the event.
    #[must_use]
    pub fn scope(&self) -> ObjectScope { self.record().scope }

    /// Whether the event is marked beta.
    #[must_use]
    pub fn is_beta(&self) -> bool { self.record().is_beta }

    /// Whether the event cannot be frozen.
    #[must_use]
    pub fn is_hot(&self) -> bool { self.record().is_hot }

    /// Whether the event restarts from the last callback when re-emitted.
    #[must_use]
    pub fn is_restart(&self) -> bool { self.record().is_restart }

    /// Returns the class emitting the event.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.resolve(self.record().class)
    }
}
