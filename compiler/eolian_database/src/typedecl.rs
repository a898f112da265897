//! Contains the named type declarations: structs, enums, aliases and function
//! pointers.

use std::sync::Arc;

use eolian_arena::ID;
use strum_macros::EnumIter;

use crate::{
    documentation::{Documentation, DocumentationData},
    expression::{Expression, ExpressionID, ExpressionMask},
    function::{Function, FunctionData},
    intern,
    r#type::{Type, TypeID},
    sequence::Sequence,
    view::View,
};

/// The kind of a [`Typedecl`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum TypedeclType {
    #[default]
    Unknown = 0,
    Struct = 1,
    StructOpaque = 2,
    Enum = 3,
    Alias = 4,
    FunctionPointer = 5,
}

/// The record backing a [`Typedecl`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedeclData {
    pub(crate) full_name: Arc<str>,
    pub(crate) file: Arc<str>,
    pub(crate) typedecl_type: TypedeclType,
    pub(crate) is_extern: bool,
    pub(crate) free_func: Option<Arc<str>>,
    pub(crate) documentation: Option<ID<DocumentationData>>,
    pub(crate) struct_fields: Vec<ID<StructFieldData>>,
    pub(crate) enum_fields: Vec<ID<EnumFieldData>>,
    pub(crate) enum_legacy_prefix: Option<Arc<str>>,
    pub(crate) base_type: Option<TypeID>,
    pub(crate) function_pointer: Option<ID<FunctionData>>,
}

impl TypedeclData {
    pub(crate) fn new(
        full_name: Arc<str>,
        file: Arc<str>,
        typedecl_type: TypedeclType,
    ) -> Self {
        Self {
            full_name,
            file,
            typedecl_type,
            is_extern: false,
            free_func: None,
            documentation: None,
            struct_fields: Vec::new(),
            enum_fields: Vec::new(),
            enum_legacy_prefix: None,
            base_type: None,
            function_pointer: None,
        }
    }
}

/// The handle of a stored type declaration.
pub type TypedeclID = ID<TypedeclData>;

/// A named type declaration.
pub type Typedecl<'db> = View<'db, TypedeclData>;

impl<'db> View<'db, TypedeclData> {
    /// Returns the kind of the declaration.
    #[must_use]
    pub fn typedecl_type(&self) -> TypedeclType { self.record().typedecl_type }

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

    /// Whether the declaration is provided by outside C code.
    #[must_use]
    pub fn is_extern(&self) -> bool { self.record().is_extern }

    /// Returns the function that frees values of the type, if declared.
    #[must_use]
    pub fn free_func(&self) -> Option<&'db str> {
        self.record().free_func.as_deref()
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }

    /// Returns the fields of a struct in declaration order.
    #[must_use]
    pub fn struct_fields(&self) -> Sequence<'db, StructField<'db>> {
        Sequence::of_ids(self.database(), &self.record().struct_fields)
    }

    /// Looks up a struct field by name.
    #[must_use]
    pub fn struct_field(&self, name: &str) -> Option<StructField<'db>> {
        self.struct_fields().find(|field| field.name() == name)
    }

    /// Returns the fields of an enum in declaration order.
    #[must_use]
    pub fn enum_fields(&self) -> Sequence<'db, EnumField<'db>> {
        Sequence::of_ids(self.database(), &self.record().enum_fields)
    }

    /// Looks up an enum field by name.
    #[must_use]
    pub fn enum_field(&self, name: &str) -> Option<EnumField<'db>> {
        self.enum_fields().find(|field| field.name() == name)
    }

    /// Returns the prefix used for the C names of the enum fields, if
    /// declared.
    #[must_use]
    pub fn enum_legacy_prefix(&self) -> Option<&'db str> {
        self.record().enum_legacy_prefix.as_deref()
    }

    /// Returns the aliased type of an alias.
    #[must_use]
    pub fn base_type(&self) -> Option<Type<'db>> {
        self.record().base_type.and_then(|id| self.resolve(id))
    }

    /// Returns the aliased type of an alias with every intermediate alias
    /// followed.
    #[must_use]
    pub fn aliased_base(&self) -> Option<Type<'db>> {
        self.base_type().map(|base| base.aliased_base())
    }

    /// Returns the signature of a function pointer declaration.
    #[must_use]
    pub fn function_pointer(&self) -> Option<Function<'db>> {
        self.record().function_pointer.and_then(|id| self.resolve(id))
    }

    /// Renders the declaration as a C declaration such as
    /// `struct Foo { int a; }`, `enum Bar { A = 0, B = 1 }` or
    /// `typedef int Baz`.
    #[must_use]
    pub fn c_type(&self) -> String {
        let name = intern::c_spelling(self.full_name());

        match self.typedecl_type() {
            TypedeclType::Struct => {
                let mut buffer = format!("struct {name} {{ ");
                for field in self.struct_fields() {
                    if let Some(ty) = field.field_type() {
                        buffer.push_str(&ty.c_declaration(field.name()));
                        buffer.push_str("; ");
                    }
                }
                buffer.push('}');
                buffer
            }
            TypedeclType::StructOpaque => format!("struct {name}"),
            TypedeclType::Enum => {
                let fields = self
                    .enum_fields()
                    .map(|field| {
                        let value = field
                            .value(true)
                            .and_then(|value| {
                                value.evaluate(ExpressionMask::INT).ok()
                            })
                            .map(|value| value.to_literal());

                        match value {
                            Some(value) => {
                                format!("{} = {value}", field.name())
                            }
                            None => field.name().to_owned(),
                        }
                    })
                    .collect::<Vec<_>>();

                format!("enum {name} {{ {} }}", fields.join(", "))
            }
            TypedeclType::Alias => match self.base_type() {
                Some(base) => format!("typedef {}", base.c_declaration(&name)),
                None => format!("typedef void {name}"),
            },
            TypedeclType::FunctionPointer => {
                let Some(function) = self.function_pointer() else {
                    return format!("typedef void (*{name})(void)");
                };

                let return_type = function
                    .return_type(crate::function::FunctionType::FunctionPointer)
                    .map_or_else(|| "void".to_owned(), |ty| ty.c_type());
                let parameters = function
                    .parameters()
                    .filter_map(|parameter| {
                        parameter
                            .parameter_type()
                            .map(|ty| ty.c_declaration(parameter.name()))
                    })
                    .collect::<Vec<_>>();

                format!(
                    "typedef {return_type} (*{name})({})",
                    if parameters.is_empty() {
                        "void".to_owned()
                    } else {
                        parameters.join(", ")
                    }
                )
            }
            TypedeclType::Unknown => name,
        }
    }
}

/// The record backing a [`StructField`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructFieldData {
    pub(crate) name: Arc<str>,
    pub(crate) field_type: TypeID,
    pub(crate) documentation: Option<ID<DocumentationData>>,
}

/// A field of a struct declaration.
pub type StructField<'db> = View<'db, StructFieldData>;

impl<'db> View<'db, StructFieldData> {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the type of the field.
    #[must_use]
    pub fn field_type(&self) -> Option<Type<'db>> {
        self.resolve(self.record().field_type)
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }
}

/// The record backing an [`EnumField`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumFieldData {
    pub(crate) name: Arc<str>,
    pub(crate) typedecl: TypedeclID,
    pub(crate) value: ExpressionID,
    pub(crate) explicit: bool,
    pub(crate) documentation: Option<ID<DocumentationData>>,
}

/// A field of an enum declaration.
pub type EnumField<'db> = View<'db, EnumFieldData>;

impl<'db> View<'db, EnumFieldData> {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'db str { &self.record().name }

    /// Returns the enum the field belongs to.
    #[must_use]
    pub fn typedecl(&self) -> Option<Typedecl<'db>> {
        self.resolve(self.record().typedecl)
    }

    /// Returns the C name of the field: the legacy prefix (or the C spelling
    /// of the enum name) and the field name, upper-cased and joined by `_`.
    #[must_use]
    pub fn c_name(&self) -> String {
        let prefix = self.typedecl().map_or_else(String::new, |typedecl| {
            typedecl.enum_legacy_prefix().map_or_else(
                || intern::c_spelling(typedecl.full_name()),
                ToOwned::to_owned,
            )
        });

        format!("{prefix}_{}", self.name()).to_uppercase()
    }

    /// Returns the documentation block, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<Documentation<'db>> {
        self.record().documentation.and_then(|id| self.resolve(id))
    }

    /// Returns the value expression.
    ///
    /// Fields without an explicit value carry an implicit one (zero for the
    /// first field, the previous field plus one otherwise) that is only
    /// returned when `force` is set.
    #[must_use]
    pub fn value(&self, force: bool) -> Option<Expression<'db>> {
        if self.record().explicit || force {
            self.resolve(self.record().value)
        } else {
            None
        }
    }

    /// Whether the value was written out in the declaration.
    #[must_use]
    pub fn is_explicit(&self) -> bool { self.record().explicit }
}
