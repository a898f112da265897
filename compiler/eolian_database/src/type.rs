//! Contains the [`Type`] references used by parameters, fields, events and
//! aliases.

use std::sync::Arc;

use derive_new::new;
use eolian_arena::ID;
use getset::{CopyGetters, Setters};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{
    class::{Class, ClassData},
    intern,
    sequence::Sequence,
    typedecl::{Typedecl, TypedeclData, TypedeclType},
    view::View,
};

/// The spelling that marks a type as deliberately undefined.
pub const UNDEFINED_TYPE_NAME: &str = "__undefined_type";

/// The broad kind of a [`Type`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum TypeType {
    #[default]
    Unknown = 0,
    Void = 1,
    Regular = 2,
    Class = 3,
    Undefined = 4,
}

/// The built-in types of the interface language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter,
)]
#[allow(missing_docs)]
pub enum BuiltinType {
    #[default]
    Invalid = 0,
    Byte = 1,
    UByte = 2,
    Char = 3,
    Short = 4,
    UShort = 5,
    Int = 6,
    UInt = 7,
    Long = 8,
    ULong = 9,
    LLong = 10,
    ULLong = 11,
    Int8 = 12,
    UInt8 = 13,
    Int16 = 14,
    UInt16 = 15,
    Int32 = 16,
    UInt32 = 17,
    Int64 = 18,
    UInt64 = 19,
    Int128 = 20,
    UInt128 = 21,
    Size = 22,
    SSize = 23,
    Intptr = 24,
    Uintptr = 25,
    Ptrdiff = 26,
    Time = 27,
    Float = 28,
    Double = 29,
    Bool = 30,
    Void = 31,
    Accessor = 32,
    Array = 33,
    Iterator = 34,
    Hash = 35,
    List = 36,
    Inarray = 37,
    Inlist = 38,
    Future = 39,
    AnyValue = 40,
    AnyValuePtr = 41,
    MString = 42,
    String = 43,
    Stringshare = 44,
    VoidPtr = 45,
    FreeCb = 46,
}

impl BuiltinType {
    /// Returns the spelling used in interface files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "",
            Self::Byte => "byte",
            Self::UByte => "ubyte",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::LLong => "llong",
            Self::ULLong => "ullong",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Int128 => "int128",
            Self::UInt128 => "uint128",
            Self::Size => "size",
            Self::SSize => "ssize",
            Self::Intptr => "intptr",
            Self::Uintptr => "uintptr",
            Self::Ptrdiff => "ptrdiff",
            Self::Time => "time",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Void => "void",
            Self::Accessor => "accessor",
            Self::Array => "array",
            Self::Iterator => "iterator",
            Self::Hash => "hash",
            Self::List => "list",
            Self::Inarray => "inarray",
            Self::Inlist => "inlist",
            Self::Future => "future",
            Self::AnyValue => "any_value",
            Self::AnyValuePtr => "any_value_ptr",
            Self::MString => "mstring",
            Self::String => "string",
            Self::Stringshare => "stringshare",
            Self::VoidPtr => "void_ptr",
            Self::FreeCb => "__builtin_free_cb",
        }
    }

    /// Returns the C spelling of the type.
    #[must_use]
    pub fn c_name(self) -> &'static str {
        match self {
            Self::Invalid => "",
            Self::Byte => "signed char",
            Self::UByte => "unsigned char",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LLong => "long long",
            Self::ULLong => "unsigned long long",
            Self::Int8 => "int8_t",
            Self::UInt8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::UInt16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::UInt32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::UInt64 => "uint64_t",
            Self::Int128 => "int128_t",
            Self::UInt128 => "uint128_t",
            Self::Size => "size_t",
            Self::SSize => "ssize_t",
            Self::Intptr => "intptr_t",
            Self::Uintptr => "uintptr_t",
            Self::Ptrdiff => "ptrdiff_t",
            Self::Time => "time_t",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "Eina_Bool",
            Self::Void => "void",
            Self::Accessor => "Eina_Accessor *",
            Self::Array => "Eina_Array *",
            Self::Iterator => "Eina_Iterator *",
            Self::Hash => "Eina_Hash *",
            Self::List => "Eina_List *",
            Self::Inarray => "Eina_Inarray *",
            Self::Inlist => "Eina_Inlist *",
            Self::Future => "Eina_Future *",
            Self::AnyValue => "Eina_Value",
            Self::AnyValuePtr => "Eina_Value *",
            Self::MString => "char *",
            Self::String => "const char *",
            Self::Stringshare => "Eina_Stringshare *",
            Self::VoidPtr => "void *",
            Self::FreeCb => "Eina_Free_Cb",
        }
    }

    /// Looks up a built-in type by its interface spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().skip(1).find(|builtin| builtin.name() == name)
    }

    /// Whether the type takes type parameters.
    #[must_use]
    pub fn is_container(self) -> bool { self.parameter_count() > 0 }

    /// Returns the number of type parameters a container expects, zero for
    /// plain types.
    #[must_use]
    pub fn parameter_count(self) -> usize {
        match self {
            Self::Accessor
            | Self::Array
            | Self::Iterator
            | Self::List
            | Self::Inarray
            | Self::Inlist
            | Self::Future => 1,
            Self::Hash => 2,
            _ => 0,
        }
    }
}

/// The qualifiers applied to a type reference. All three are independent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, new, CopyGetters, Setters,
)]
pub struct Qualifiers {
    /// Whether the holder owns the value.
    #[get_copy = "pub"]
    #[set = "pub"]
    owned: bool,

    /// Whether the value is read-only.
    #[get_copy = "pub"]
    #[set = "pub"]
    is_const: bool,

    /// Whether the value is passed by pointer.
    #[get_copy = "pub"]
    #[set = "pub"]
    ptr: bool,
}

/// The record backing a [`Type`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeData {
    pub(crate) full_name: Arc<str>,
    pub(crate) file: Arc<str>,
    pub(crate) type_type: TypeType,
    pub(crate) builtin: BuiltinType,
    pub(crate) qualifiers: Qualifiers,
    pub(crate) free_func: Option<Arc<str>>,
    pub(crate) base_type: Option<TypeID>,
    pub(crate) next_type: Option<TypeID>,
    pub(crate) typedecl: Option<ID<TypedeclData>>,
    pub(crate) class: Option<ID<ClassData>>,
}

/// The handle of a stored type reference.
pub type TypeID = ID<TypeData>;

/// A type reference.
pub type Type<'db> = View<'db, TypeData>;

impl<'db> View<'db, TypeData> {
    /// Returns the broad kind of the type.
    #[must_use]
    pub fn type_type(&self) -> TypeType { self.record().type_type }

    /// Returns the built-in type, [`BuiltinType::Invalid`] for user types.
    #[must_use]
    pub fn builtin_type(&self) -> BuiltinType { self.record().builtin }

    /// Returns the unqualified name.
    #[must_use]
    pub fn name(&self) -> &'db str { intern::short_name(self.full_name()) }

    /// Returns the dotted name as written.
    #[must_use]
    pub fn full_name(&self) -> &'db str { &self.record().full_name }

    /// Returns the namespace segments, outermost first.
    #[must_use]
    pub fn namespaces(&self) -> Sequence<'db, &'db str> {
        Sequence::new(intern::namespaces(self.full_name()))
    }

    /// Returns the name of the file the reference appears in.
    #[must_use]
    pub fn file(&self) -> &'db str { &self.record().file }

    /// Returns the qualifiers of the reference.
    #[must_use]
    pub fn qualifiers(&self) -> Qualifiers { self.record().qualifiers }

    /// Whether the holder owns the value.
    #[must_use]
    pub fn is_owned(&self) -> bool { self.record().qualifiers.owned }

    /// Whether the value is read-only.
    #[must_use]
    pub fn is_const(&self) -> bool { self.record().qualifiers.is_const }

    /// Whether the value is passed by pointer.
    #[must_use]
    pub fn is_ptr(&self) -> bool { self.record().qualifiers.ptr }

    /// Returns the function that frees an owned value, if declared.
    #[must_use]
    pub fn free_func(&self) -> Option<&'db str> {
        self.record().free_func.as_deref()
    }

    /// Returns the first type parameter of a container.
    #[must_use]
    pub fn base_type(&self) -> Option<Self> {
        self.record().base_type.and_then(|id| self.resolve(id))
    }

    /// Returns the following sibling in a type parameter list.
    #[must_use]
    pub fn next_type(&self) -> Option<Self> {
        self.record().next_type.and_then(|id| self.resolve(id))
    }

    /// Returns the type parameters of a container in order.
    #[must_use]
    pub fn parameters(&self) -> Sequence<'db, Self> {
        Sequence::new(std::iter::successors(self.base_type(), Self::next_type))
    }

    /// Returns the declaration a user type refers to.
    #[must_use]
    pub fn typedecl(&self) -> Option<Typedecl<'db>> {
        self.record().typedecl.and_then(|id| self.resolve(id))
    }

    /// Returns the class a class type refers to.
    #[must_use]
    pub fn class(&self) -> Option<Class<'db>> {
        self.record().class.and_then(|id| self.resolve(id))
    }

    /// Follows aliases until a non-alias type is reached.
    ///
    /// Returns the type itself when it does not refer to an alias.
    #[must_use]
    pub fn aliased_base(&self) -> Self {
        let mut current = *self;

        // alias cycles are cut off at the evaluation depth
        for _ in 0..crate::expression::MAXIMUM_DEPTH {
            match current.typedecl() {
                Some(typedecl)
                    if typedecl.typedecl_type() == TypedeclType::Alias =>
                {
                    match typedecl.base_type() {
                        Some(base) => current = base,
                        None => break,
                    }
                }
                _ => break,
            }
        }

        current
    }

    /// Renders the type the way it is spelled in C.
    #[must_use]
    pub fn c_type(&self) -> String {
        let mut buffer = String::new();
        let record = self.record();

        if record.qualifiers.is_const {
            buffer.push_str("const ");
        }

        match record.type_type {
            TypeType::Void => buffer.push_str("void"),
            TypeType::Class => buffer.push_str("Eo *"),
            TypeType::Regular if record.builtin != BuiltinType::Invalid => {
                buffer.push_str(record.builtin.c_name());
            }
            TypeType::Regular | TypeType::Undefined | TypeType::Unknown => {
                buffer.push_str(&intern::c_spelling(&record.full_name));
            }
        }

        if record.qualifiers.ptr {
            if !buffer.ends_with('*') {
                buffer.push(' ');
            }
            buffer.push('*');
        }

        buffer
    }

    /// Renders the type in C followed by a declarator name, without a space
    /// after a pointer star.
    #[must_use]
    pub fn c_declaration(&self, name: &str) -> String {
        let mut buffer = self.c_type();

        if !buffer.ends_with('*') {
            buffer.push(' ');
        }
        buffer.push_str(name);

        buffer
    }
}

/// Renders the canonical interface spelling: the name with its type
/// parameters, wrapped in `ptr(...)`, `const(...)` and `own(...)` from the
/// inside out.
impl std::fmt::Display for View<'_, TypeData> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let qualifiers = self.qualifiers();
        let wrappers = [
            (qualifiers.owned, "own"),
            (qualifiers.is_const, "const"),
            (qualifiers.ptr, "ptr"),
        ];

        for (_, wrapper) in wrappers.iter().filter(|(applied, _)| *applied) {
            write!(f, "{wrapper}(")?;
        }

        f.write_str(self.full_name())?;

        let mut parameters = self.parameters().peekable();
        if parameters.peek().is_some() {
            f.write_str("<")?;
            for (index, parameter) in parameters.enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{parameter}")?;
            }
            f.write_str(">")?;
        }

        for _ in wrappers.iter().filter(|(applied, _)| *applied) {
            f.write_str(")")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert_eq, proptest};
    use strum::IntoEnumIterator;

    use super::{BuiltinType, Qualifiers};

    #[test]
    fn builtin_spellings_round_trip() {
        for builtin in BuiltinType::iter().skip(1) {
            assert_eq!(BuiltinType::from_name(builtin.name()), Some(builtin));
        }

        assert_eq!(BuiltinType::from_name(""), None);
        assert_eq!(BuiltinType::from_name("Efl.Object"), None);
    }

    #[test]
    fn container_parameters() {
        assert_eq!(BuiltinType::Hash.parameter_count(), 2);
        assert_eq!(BuiltinType::List.parameter_count(), 1);
        assert!(BuiltinType::Future.is_container());
        assert!(!BuiltinType::String.is_container());
        assert_eq!(BuiltinType::Bool.c_name(), "Eina_Bool");
    }

    proptest! {
        #[test]
        fn qualifiers_are_independent(
            owned in proptest::bool::ANY,
            is_const in proptest::bool::ANY,
            ptr in proptest::bool::ANY,
            flipped in 0..3usize,
        ) {
            let mut qualifiers = Qualifiers::new(owned, is_const, ptr);

            match flipped {
                0 => { qualifiers.set_owned(!owned); }
                1 => { qualifiers.set_is_const(!is_const); }
                _ => { qualifiers.set_ptr(!ptr); }
            }

            prop_assert_eq!(qualifiers.owned(), owned != (flipped == 0));
            prop_assert_eq!(qualifiers.is_const(), is_const != (flipped == 1));
            prop_assert_eq!(qualifiers.ptr(), ptr != (flipped == 2));
        }
    }
}
