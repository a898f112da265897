//! Contains the parsed, unresolved form of one interface or types file.
//!
//! A [`crate::frontend::Frontend`] produces a [`FileSyntax`]; the database then
//! resolves names, checks it and turns it into stored objects. Every record
//! defaults its omitted fields, so a file only spells out what it uses.

use serde::{Deserialize, Serialize};

use crate::{
    class::ClassType,
    function::{ObjectScope, ParameterDirection},
};

/// The content of one file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct FileSyntax {
    /// Names of files to load first, without extension.
    pub imports: Vec<String>,
    pub class: Option<ClassSyntax>,
    pub structs: Vec<StructSyntax>,
    pub enums: Vec<EnumSyntax>,
    pub aliases: Vec<AliasSyntax>,
    pub function_pointers: Vec<FunctionPointerSyntax>,
    pub constants: Vec<VariableSyntax>,
    pub globals: Vec<VariableSyntax>,
}

/// A documentation block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct DocumentationSyntax {
    pub summary: String,
    pub description: Option<String>,
    pub since: Option<String>,
}

/// A type reference such as `own(hash<string, int>)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct TypeSyntax {
    /// A built-in name, `void`, or the dotted name of a class or a type
    /// declaration.
    pub name: String,
    pub owned: bool,
    #[serde(rename = "const")]
    pub is_const: bool,
    pub ptr: bool,
    /// The type parameters of a container.
    pub params: Vec<TypeSyntax>,
    pub free_func: Option<String>,
}

impl TypeSyntax {
    /// Creates an unqualified reference to `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// A struct declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct StructSyntax {
    pub name: String,
    /// An opaque struct has no visible fields.
    pub opaque: bool,
    #[serde(rename = "extern")]
    pub is_extern: bool,
    pub free_func: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
    pub fields: Vec<StructFieldSyntax>,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct StructFieldSyntax {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
    pub documentation: Option<DocumentationSyntax>,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct EnumSyntax {
    pub name: String,
    #[serde(rename = "extern")]
    pub is_extern: bool,
    /// The prefix of the C names of the fields.
    pub legacy: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
    pub fields: Vec<EnumFieldSyntax>,
}

/// An enum field with an optional value expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct EnumFieldSyntax {
    pub name: String,
    pub value: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
}

/// A type alias.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct AliasSyntax {
    pub name: String,
    #[serde(rename = "extern")]
    pub is_extern: bool,
    pub free_func: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
}

/// A function pointer type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct FunctionPointerSyntax {
    pub name: String,
    #[serde(rename = "extern")]
    pub is_extern: bool,
    pub documentation: Option<DocumentationSyntax>,
    #[serde(rename = "return")]
    pub return_value: Option<ReturnSyntax>,
    pub parameters: Vec<ParameterSyntax>,
}

/// A constant or a global.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct VariableSyntax {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
    pub value: Option<String>,
    #[serde(rename = "extern")]
    pub is_extern: bool,
    pub documentation: Option<DocumentationSyntax>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ClassSyntax {
    pub name: String,
    #[serde(rename = "type")]
    pub class_type: ClassType,
    pub documentation: Option<DocumentationSyntax>,
    pub legacy_prefix: Option<String>,
    pub eo_prefix: Option<String>,
    pub event_prefix: Option<String>,
    pub data_type: Option<String>,
    pub inherits: Vec<String>,
    pub methods: Vec<MethodSyntax>,
    pub properties: Vec<PropertySyntax>,
    pub events: Vec<EventSyntax>,
    pub parts: Vec<PartSyntax>,
    pub implements: Vec<ImplementSyntax>,
    pub constructors: Vec<ConstructorSyntax>,
}

/// The return value of a method, an accessor or a function pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ReturnSyntax {
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
    /// The value returned on error.
    pub default: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
    pub warn_unused: bool,
}

/// A parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ParameterSyntax {
    pub name: String,
    pub direction: ParameterDirection,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
    pub default: Option<String>,
    pub documentation: Option<DocumentationSyntax>,
    pub nonull: bool,
    pub nullable: bool,
    pub optional: bool,
}

/// A method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct MethodSyntax {
    pub name: String,
    pub scope: ObjectScope,
    #[serde(rename = "class")]
    pub is_class: bool,
    pub beta: bool,
    #[serde(rename = "const")]
    pub object_is_const: bool,
    pub pure_virtual: bool,
    pub legacy: Option<String>,
    pub legacy_only: bool,
    pub documentation: Option<DocumentationSyntax>,
    #[serde(rename = "return")]
    pub return_value: Option<ReturnSyntax>,
    pub parameters: Vec<ParameterSyntax>,
}

/// A property with its shared keys and values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PropertySyntax {
    pub name: String,
    #[serde(rename = "class")]
    pub is_class: bool,
    pub beta: bool,
    pub documentation: Option<DocumentationSyntax>,
    pub keys: Vec<ParameterSyntax>,
    pub values: Vec<ParameterSyntax>,
    pub get: Option<AccessorSyntax>,
    pub set: Option<AccessorSyntax>,
}

/// One accessor of a property. Keys and values given here replace the
/// property's shared ones for this accessor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct AccessorSyntax {
    pub scope: ObjectScope,
    #[serde(rename = "const")]
    pub object_is_const: bool,
    pub pure_virtual: bool,
    pub legacy: Option<String>,
    pub legacy_only: bool,
    pub documentation: Option<DocumentationSyntax>,
    #[serde(rename = "return")]
    pub return_value: Option<ReturnSyntax>,
    pub keys: Option<Vec<ParameterSyntax>>,
    pub values: Option<Vec<ParameterSyntax>>,
}

/// An event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct EventSyntax {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<TypeSyntax>,
    pub scope: ObjectScope,
    pub beta: bool,
    pub hot: bool,
    pub restart: bool,
    pub documentation: Option<DocumentationSyntax>,
}

/// A part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PartSyntax {
    pub name: String,
    /// The dotted name of the part's class.
    pub class: String,
    pub documentation: Option<DocumentationSyntax>,
}

/// An implement entry.
///
/// The name is `Class.Name.function`, `.function` for the class's own
/// functions, or `class.constructor`/`class.destructor` to enable the class
/// constructor and destructor. Without `get` and `set`, a property implement
/// covers every accessor the property has.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ImplementSyntax {
    pub name: String,
    pub get: bool,
    pub set: bool,
    pub auto: bool,
    pub empty: bool,
    pub pure_virtual: bool,
    pub documentation: Option<DocumentationSyntax>,
    pub get_documentation: Option<DocumentationSyntax>,
    pub set_documentation: Option<DocumentationSyntax>,
}

/// A constructor entry, named like an implement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ConstructorSyntax {
    pub name: String,
    pub optional: bool,
}
