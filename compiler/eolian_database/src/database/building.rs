//! Turns the syntax of one file into stored objects.
//!
//! Every object created while building a file is recorded in a journal. When
//! a step fails the journal is replayed backwards, so a failed file leaves no
//! record and no index entry behind.

use std::{collections::HashSet, sync::Arc};

use eolian_arena::ID;
use log::debug;

use super::{
    registry::{Registry, Selector},
    Database, Error, FileKind,
};
use crate::{
    class::{ClassData, ClassID, ConstructorData, EventData, PartData},
    declaration::{DeclarationData, DeclarationTarget, DeclarationType},
    documentation::DocumentationData,
    expression::{
        self, BinaryOperator, ExpressionData, ExpressionID, Literal, Tree,
    },
    function::{
        AccessorData, FunctionData, FunctionID, FunctionType, ParameterData,
        ParameterID,
    },
    implement::{ImplementData, ImplementFlags, ImplementID},
    intern,
    r#type::{
        BuiltinType, Qualifiers, TypeData, TypeID, TypeType,
        UNDEFINED_TYPE_NAME,
    },
    syntax::{
        AccessorSyntax, AliasSyntax, ClassSyntax, DocumentationSyntax,
        EnumSyntax, FileSyntax, FunctionPointerSyntax, ImplementSyntax,
        MethodSyntax, ParameterSyntax, PropertySyntax, ReturnSyntax,
        StructSyntax, TypeSyntax, VariableSyntax,
    },
    typedecl::{
        EnumFieldData, StructFieldData, TypedeclData, TypedeclID, TypedeclType,
    },
    variable::{VariableData, VariableType},
    view::{Entity, View},
};

type Undo = Box<dyn FnOnce(&mut Database)>;

/// Builds the objects of one file into a [`Database`].
pub(super) struct Builder<'a> {
    database: &'a mut Database,
    file: Arc<str>,
    kind: FileKind,
    journal: Vec<Undo>,
}

fn duplicate(owner: &str, name: &str) -> Error {
    Error::DuplicateMember { owner: owner.to_owned(), name: name.to_owned() }
}

impl<'a> Builder<'a> {
    pub(super) fn new(
        database: &'a mut Database,
        file: Arc<str>,
        kind: FileKind,
    ) -> Self {
        Self { database, file, kind, journal: Vec::new() }
    }

    /// Builds `syntax`, undoing every change if it fails.
    pub(super) fn build(mut self, syntax: &FileSyntax) -> Result<(), Error> {
        match self.build_file(syntax) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }

    fn rollback(self) {
        let Self { database, file, journal, .. } = self;

        debug!("undoing {} changes made by `{file}`", journal.len());

        for undo in journal.into_iter().rev() {
            undo(&mut *database);
        }
    }

    fn intern(&mut self, text: &str) -> Arc<str> {
        self.database.storage.interner.intern(text)
    }

    fn intern_optional(&mut self, text: Option<&str>) -> Option<Arc<str>> {
        text.map(|text| self.intern(text))
    }

    fn insert<T: Entity>(&mut self, record: T) -> ID<T> {
        let id = T::arena_mut(&mut self.database.storage).insert(record);

        self.journal.push(Box::new(move |database: &mut Database| {
            let _ = T::arena_mut(&mut database.storage).remove(id);
        }));

        id
    }

    fn register<T: 'static>(
        &mut self,
        select: Selector<T>,
        name: &Arc<str>,
        id: ID<T>,
    ) -> Result<(), Error> {
        select(&mut self.database.registry)
            .insert(name.clone(), self.file.clone(), id)
            .map_err(|file| Error::Redefinition {
                name: name.to_string(),
                file: file.to_string(),
            })?;

        let name = name.clone();
        self.journal.push(Box::new(move |database: &mut Database| {
            select(&mut database.registry).remove(&name);
        }));

        Ok(())
    }

    /// Fails if a declaration already uses `name`.
    fn check_available(&self, name: &str) -> Result<(), Error> {
        match self.database.registry.declarations.get(name) {
            Some((_, file)) => Err(Error::Redefinition {
                name: name.to_owned(),
                file: file.to_owned(),
            }),
            None => Ok(()),
        }
    }

    fn declare(
        &mut self,
        name: &Arc<str>,
        declaration_type: DeclarationType,
        target: DeclarationTarget,
    ) -> Result<(), Error> {
        let id = self.insert(DeclarationData {
            full_name: name.clone(),
            file: self.file.clone(),
            declaration_type,
            target,
        });

        self.register(Registry::declarations_mut, name, id)
    }

    fn dependency(&self, source: Error) -> Error {
        Error::Dependency {
            file: self.file.to_string(),
            source: Box::new(source),
        }
    }

    fn build_file(&mut self, syntax: &FileSyntax) -> Result<(), Error> {
        match (self.kind, &syntax.class) {
            (FileKind::Interface, None) => {
                return Err(Error::MissingClass(self.file.to_string()));
            }
            (FileKind::Types, Some(_)) => {
                return Err(Error::UnexpectedClass(self.file.to_string()));
            }
            _ => {}
        }

        for import in &syntax.imports {
            self.import(import)?;
        }

        // every name of the file is registered before anything is resolved
        let class = match &syntax.class {
            Some(class) => Some((self.declare_class(class)?, class)),
            None => None,
        };

        let structs = syntax
            .structs
            .iter()
            .map(|syntax| {
                let typedecl_type = if syntax.opaque {
                    TypedeclType::StructOpaque
                } else {
                    TypedeclType::Struct
                };

                self.declare_typedecl(
                    &syntax.name,
                    typedecl_type,
                    Registry::structs_mut,
                    DeclarationType::Struct,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let enums = syntax
            .enums
            .iter()
            .map(|syntax| {
                self.declare_typedecl(
                    &syntax.name,
                    TypedeclType::Enum,
                    Registry::enums_mut,
                    DeclarationType::Enum,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let aliases = syntax
            .aliases
            .iter()
            .map(|syntax| {
                self.declare_typedecl(
                    &syntax.name,
                    TypedeclType::Alias,
                    Registry::aliases_mut,
                    DeclarationType::Alias,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let function_pointers = syntax
            .function_pointers
            .iter()
            .map(|syntax| {
                self.declare_typedecl(
                    &syntax.name,
                    TypedeclType::FunctionPointer,
                    Registry::aliases_mut,
                    DeclarationType::Alias,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (id, syntax) in structs.into_iter().zip(&syntax.structs) {
            self.fill_struct(id, syntax)?;
        }

        for (id, syntax) in enums.into_iter().zip(&syntax.enums) {
            self.fill_enum(id, syntax)?;
        }

        for (id, syntax) in aliases.into_iter().zip(&syntax.aliases) {
            self.fill_alias(id, syntax)?;
        }

        for (id, syntax) in
            function_pointers.into_iter().zip(&syntax.function_pointers)
        {
            self.fill_function_pointer(id, syntax)?;
        }

        for constant in &syntax.constants {
            self.declare_variable(constant, VariableType::Constant)?;
        }

        for global in &syntax.globals {
            self.declare_variable(global, VariableType::Global)?;
        }

        if let Some((id, syntax)) = class {
            self.fill_class(id, syntax)?;
        }

        Ok(())
    }

    /// Parses `import.eot`, or `import.eo` if there is no such types file.
    fn import(&mut self, import: &str) -> Result<(), Error> {
        let config = self.database.session.config();
        let candidates = [
            format!("{import}.{}", config.types_extension()),
            format!("{import}.{}", config.interface_extension()),
        ];

        let file = candidates
            .iter()
            .find_map(|candidate| self.database.scanned_file(candidate))
            .ok_or_else(|| Error::UnknownFile(import.to_owned()))?;

        self.database.parse_file(&file).map_err(|err| self.dependency(err))
    }

    /// Looks up a class, loading the interface file derived from its name
    /// (`Efl.Ui.Button` from `efl_ui_button.eo`) if it is not known yet.
    fn resolve_class(&mut self, name: &str) -> Result<ClassID, Error> {
        if let Some((id, _)) = self.database.registry.classes.get(name) {
            return Ok(id);
        }

        let file_name = format!(
            "{}.{}",
            intern::c_spelling(name).to_lowercase(),
            self.database.session.config().interface_extension()
        );

        if let Some(file) = self.database.scanned_file(&file_name) {
            self.database
                .parse_file(&file)
                .map_err(|err| self.dependency(err))?;

            if let Some((id, _)) = self.database.registry.classes.get(name) {
                return Ok(id);
            }
        }

        Err(Error::UnresolvedClass(name.to_owned()))
    }

    fn documentation(
        &mut self,
        syntax: Option<&DocumentationSyntax>,
    ) -> Option<ID<DocumentationData>> {
        let syntax = syntax?;

        let record = DocumentationData {
            summary: self.intern(&syntax.summary),
            description: self.intern_optional(syntax.description.as_deref()),
            since: self.intern_optional(syntax.since.as_deref()),
        };

        Some(self.insert(record))
    }

    fn expression(&mut self, text: &str) -> Result<ExpressionID, Error> {
        let tree = expression::parse(text).map_err(|source| Error::Expression {
            text: text.to_owned(),
            file: self.file.to_string(),
            source,
        })?;

        Ok(self.store_tree(tree))
    }

    fn optional_expression(
        &mut self,
        text: Option<&str>,
    ) -> Result<Option<ExpressionID>, Error> {
        text.map(|text| self.expression(text)).transpose()
    }

    fn store_tree(&mut self, tree: Tree) -> ExpressionID {
        let record = match tree {
            Tree::Literal(literal) => ExpressionData::Literal(literal),
            Tree::Unary { operator, operand } => ExpressionData::Unary {
                operator,
                operand: self.store_tree(*operand),
            },
            Tree::Binary { operator, lhs, rhs } => {
                let lhs = self.store_tree(*lhs);
                let rhs = self.store_tree(*rhs);

                ExpressionData::Binary { operator, lhs, rhs }
            }
        };

        self.insert(record)
    }

    fn resolve_type(&mut self, syntax: &TypeSyntax) -> Result<TypeID, Error> {
        self.resolve_type_in_list(syntax, None)
    }

    /// Resolves a type reference whose following sibling in a type parameter
    /// list is `next_type`.
    fn resolve_type_in_list(
        &mut self,
        syntax: &TypeSyntax,
        next_type: Option<TypeID>,
    ) -> Result<TypeID, Error> {
        let name = syntax.name.as_str();
        let invalid = |reason: String| Error::InvalidType {
            name: name.to_owned(),
            reason,
        };

        let (type_type, builtin, typedecl, class) = if name == "void" {
            (TypeType::Void, BuiltinType::Void, None, None)
        } else if name == UNDEFINED_TYPE_NAME {
            (TypeType::Undefined, BuiltinType::Invalid, None, None)
        } else if let Some(builtin) = BuiltinType::from_name(name) {
            (TypeType::Regular, builtin, None, None)
        } else if let Some(typedecl) = self.database.registry.typedecl(name) {
            (TypeType::Regular, BuiltinType::Invalid, Some(typedecl), None)
        } else {
            let class = self.resolve_class(name).map_err(|err| match err {
                Error::UnresolvedClass(_) => {
                    Error::UnresolvedType(name.to_owned())
                }
                other => other,
            })?;

            (TypeType::Class, BuiltinType::Invalid, None, Some(class))
        };

        let expected = builtin.parameter_count();
        if syntax.params.len() != expected {
            return Err(invalid(format!(
                "expected {expected} type parameters, found {}",
                syntax.params.len()
            )));
        }

        let mut base_type = None;
        for parameter in syntax.params.iter().rev() {
            base_type = Some(self.resolve_type_in_list(parameter, base_type)?);
        }

        let record = TypeData {
            full_name: self.intern(name),
            file: self.file.clone(),
            type_type,
            builtin,
            qualifiers: Qualifiers::new(
                syntax.owned,
                syntax.is_const,
                syntax.ptr,
            ),
            free_func: self.intern_optional(syntax.free_func.as_deref()),
            base_type,
            next_type,
            typedecl,
            class,
        };

        Ok(self.insert(record))
    }

    fn declare_class(
        &mut self,
        syntax: &ClassSyntax,
    ) -> Result<ClassID, Error> {
        let name = self.intern(&syntax.name);
        self.check_available(&name)?;

        let id = self.insert(ClassData::new(
            name.clone(),
            self.file.clone(),
            syntax.class_type,
        ));

        self.register(Registry::classes_mut, &name, id)?;
        self.declare(
            &name,
            DeclarationType::Class,
            DeclarationTarget::Class(id),
        )?;

        Ok(id)
    }

    fn declare_typedecl(
        &mut self,
        name: &str,
        typedecl_type: TypedeclType,
        select: Selector<TypedeclData>,
        declaration_type: DeclarationType,
    ) -> Result<TypedeclID, Error> {
        let name = self.intern(name);
        self.check_available(&name)?;

        let id = self.insert(TypedeclData::new(
            name.clone(),
            self.file.clone(),
            typedecl_type,
        ));

        self.register(select, &name, id)?;
        self.declare(&name, declaration_type, DeclarationTarget::Typedecl(id))?;

        Ok(id)
    }

    fn fill_struct(
        &mut self,
        id: TypedeclID,
        syntax: &StructSyntax,
    ) -> Result<(), Error> {
        if syntax.opaque && !syntax.fields.is_empty() {
            return Err(Error::InvalidType {
                name: syntax.name.clone(),
                reason: "an opaque struct cannot declare fields".to_owned(),
            });
        }

        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(syntax.fields.len());

        for field in &syntax.fields {
            if !names.insert(field.name.as_str()) {
                return Err(duplicate(&syntax.name, &field.name));
            }

            let record = StructFieldData {
                name: self.intern(&field.name),
                field_type: self.resolve_type(&field.ty)?,
                documentation: self.documentation(field.documentation.as_ref()),
            };

            fields.push(self.insert(record));
        }

        let documentation = self.documentation(syntax.documentation.as_ref());
        let free_func = self.intern_optional(syntax.free_func.as_deref());

        let record = &mut self.database.storage.typedecls[id];
        record.is_extern = syntax.is_extern;
        record.free_func = free_func;
        record.documentation = documentation;
        record.struct_fields = fields;

        Ok(())
    }

    fn fill_enum(
        &mut self,
        id: TypedeclID,
        syntax: &EnumSyntax,
    ) -> Result<(), Error> {
        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(syntax.fields.len());
        // implicit values count up from the last explicit one
        let mut anchor: Option<ExpressionID> = None;
        let mut offset = 0;

        for field in &syntax.fields {
            if !names.insert(field.name.as_str()) {
                return Err(duplicate(&syntax.name, &field.name));
            }

            let (value, explicit) = if let Some(text) = &field.value {
                let value = self.expression(text)?;
                anchor = Some(value);
                offset = 1;

                (value, true)
            } else {
                let value = self.implicit_value(anchor, offset);
                offset += 1;

                (value, false)
            };

            let record = EnumFieldData {
                name: self.intern(&field.name),
                typedecl: id,
                value,
                explicit,
                documentation: self.documentation(field.documentation.as_ref()),
            };

            fields.push(self.insert(record));
        }

        let documentation = self.documentation(syntax.documentation.as_ref());
        let legacy = self.intern_optional(syntax.legacy.as_deref());

        let record = &mut self.database.storage.typedecls[id];
        record.is_extern = syntax.is_extern;
        record.documentation = documentation;
        record.enum_legacy_prefix = legacy;
        record.enum_fields = fields;

        Ok(())
    }

    /// Creates the value of an enum field written without one: `offset`
    /// itself when no field before it has an explicit value, the last
    /// explicit value plus `offset` otherwise.
    fn implicit_value(
        &mut self,
        anchor: Option<ExpressionID>,
        offset: i32,
    ) -> ExpressionID {
        let offset = self.insert(ExpressionData::Literal(Literal::Int(offset)));

        match anchor {
            None => offset,
            Some(anchor) => self.insert(ExpressionData::Binary {
                operator: BinaryOperator::Add,
                lhs: anchor,
                rhs: offset,
            }),
        }
    }

    fn fill_alias(
        &mut self,
        id: TypedeclID,
        syntax: &AliasSyntax,
    ) -> Result<(), Error> {
        let base_type = self.resolve_type(&syntax.ty)?;
        let documentation = self.documentation(syntax.documentation.as_ref());
        let free_func = self.intern_optional(syntax.free_func.as_deref());

        let record = &mut self.database.storage.typedecls[id];
        record.is_extern = syntax.is_extern;
        record.free_func = free_func;
        record.documentation = documentation;
        record.base_type = Some(base_type);

        Ok(())
    }

    fn fill_function_pointer(
        &mut self,
        id: TypedeclID,
        syntax: &FunctionPointerSyntax,
    ) -> Result<(), Error> {
        let parameters = self.parameters(&syntax.name, &syntax.parameters)?;

        let mut accessor = AccessorData::default();
        self.return_value(&mut accessor, syntax.return_value.as_ref())?;

        let function = FunctionData {
            name: self.intern(&syntax.name),
            class: None,
            function_type: FunctionType::FunctionPointer,
            is_class: false,
            is_beta: false,
            object_is_const: false,
            parameters,
            method: Some(accessor),
            getter: None,
            setter: None,
            implement: None,
        };
        let function = self.insert(function);
        let documentation = self.documentation(syntax.documentation.as_ref());

        let record = &mut self.database.storage.typedecls[id];
        record.is_extern = syntax.is_extern;
        record.documentation = documentation;
        record.function_pointer = Some(function);

        Ok(())
    }

    fn declare_variable(
        &mut self,
        syntax: &VariableSyntax,
        variable_type: VariableType,
    ) -> Result<(), Error> {
        let name = self.intern(&syntax.name);
        self.check_available(&name)?;

        let record = VariableData {
            full_name: name.clone(),
            file: self.file.clone(),
            variable_type,
            base_type: self.resolve_type(&syntax.ty)?,
            value: self.optional_expression(syntax.value.as_deref())?,
            is_extern: syntax.is_extern,
            documentation: self.documentation(syntax.documentation.as_ref()),
        };
        let id = self.insert(record);

        let select: Selector<VariableData> = match variable_type {
            VariableType::Global => Registry::globals_mut,
            VariableType::Constant | VariableType::Unknown => {
                Registry::constants_mut
            }
        };

        self.register(select, &name, id)?;
        self.declare(
            &name,
            DeclarationType::Var,
            DeclarationTarget::Variable(id),
        )
    }

    fn parameter(
        &mut self,
        syntax: &ParameterSyntax,
    ) -> Result<ParameterID, Error> {
        let record = ParameterData {
            name: self.intern(&syntax.name),
            direction: syntax.direction,
            parameter_type: self.resolve_type(&syntax.ty)?,
            default_value: self.optional_expression(syntax.default.as_deref())?,
            documentation: self.documentation(syntax.documentation.as_ref()),
            is_nonull: syntax.nonull,
            is_nullable: syntax.nullable,
            is_optional: syntax.optional,
        };

        Ok(self.insert(record))
    }

    fn parameters(
        &mut self,
        owner: &str,
        syntax: &[ParameterSyntax],
    ) -> Result<Vec<ParameterID>, Error> {
        let mut names = HashSet::new();

        syntax
            .iter()
            .map(|parameter| {
                if !names.insert(parameter.name.as_str()) {
                    return Err(duplicate(owner, &parameter.name));
                }

                self.parameter(parameter)
            })
            .collect()
    }

    fn return_value(
        &mut self,
        accessor: &mut AccessorData,
        syntax: Option<&ReturnSyntax>,
    ) -> Result<(), Error> {
        let Some(syntax) = syntax else {
            return Ok(());
        };

        accessor.return_type = Some(self.resolve_type(&syntax.ty)?);
        accessor.return_default =
            self.optional_expression(syntax.default.as_deref())?;
        accessor.return_documentation =
            self.documentation(syntax.documentation.as_ref());
        accessor.return_warn_unused = syntax.warn_unused;

        Ok(())
    }

    fn fill_class(
        &mut self,
        id: ClassID,
        syntax: &ClassSyntax,
    ) -> Result<(), Error> {
        let documentation = self.documentation(syntax.documentation.as_ref());
        let legacy_prefix =
            self.intern_optional(syntax.legacy_prefix.as_deref());
        let eo_prefix = self.intern_optional(syntax.eo_prefix.as_deref());
        let event_prefix = self.intern_optional(syntax.event_prefix.as_deref());
        let data_type = self.intern_optional(syntax.data_type.as_deref());

        let inherits = syntax
            .inherits
            .iter()
            .map(|name| self.resolve_class(name))
            .collect::<Result<Vec<_>, _>>()?;

        {
            let record = &mut self.database.storage.classes[id];
            record.documentation = documentation;
            record.legacy_prefix = legacy_prefix;
            record.eo_prefix = eo_prefix;
            record.event_prefix = event_prefix;
            record.data_type = data_type;
            record.inherits = inherits;
        }

        let mut names = HashSet::new();
        let mut functions = Vec::new();
        let mut implements = Vec::new();

        for method in &syntax.methods {
            if !names.insert(method.name.as_str()) {
                return Err(duplicate(&syntax.name, &method.name));
            }

            let (function, implement) = self.method(id, &syntax.name, method)?;
            functions.push(function);
            implements.push(implement);
        }

        for property in &syntax.properties {
            if !names.insert(property.name.as_str()) {
                return Err(duplicate(&syntax.name, &property.name));
            }

            let (function, implement) =
                self.property(id, &syntax.name, property)?;
            functions.push(function);
            implements.push(implement);
        }

        self.database.storage.classes[id].functions = functions;

        let mut names = HashSet::new();
        let mut events = Vec::with_capacity(syntax.events.len());
        for event in &syntax.events {
            if !names.insert(event.name.as_str()) {
                return Err(duplicate(&syntax.name, &event.name));
            }

            let record = EventData {
                name: self.intern(&event.name),
                class: id,
                event_type: event
                    .ty
                    .as_ref()
                    .map(|ty| self.resolve_type(ty))
                    .transpose()?,
                documentation: self.documentation(event.documentation.as_ref()),
                scope: event.scope,
                is_beta: event.beta,
                is_hot: event.hot,
                is_restart: event.restart,
            };
            events.push(self.insert(record));
        }

        let mut names = HashSet::new();
        let mut parts = Vec::with_capacity(syntax.parts.len());
        for part in &syntax.parts {
            if !names.insert(part.name.as_str()) {
                return Err(duplicate(&syntax.name, &part.name));
            }

            let record = PartData {
                name: self.intern(&part.name),
                class: self.resolve_class(&part.class)?,
                documentation: self.documentation(part.documentation.as_ref()),
            };
            parts.push(self.insert(record));
        }

        {
            let record = &mut self.database.storage.classes[id];
            record.events = events;
            record.parts = parts;
        }

        for implement in &syntax.implements {
            if let Some(implement) = self.explicit_implement(id, implement)? {
                implements.push(implement);
            }
        }

        let constructors = syntax
            .constructors
            .iter()
            .map(|constructor| -> Result<_, Error> {
                let (class, function) =
                    self.resolve_member(id, &constructor.name)?;
                let full_name = self.member_name(class, function);

                Ok(self.insert(ConstructorData {
                    full_name,
                    class,
                    function,
                    is_optional: constructor.optional,
                }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let record = &mut self.database.storage.classes[id];
        record.implements = implements;
        record.constructors = constructors;

        Ok(())
    }

    fn method(
        &mut self,
        class: ClassID,
        class_name: &str,
        syntax: &MethodSyntax,
    ) -> Result<(FunctionID, ImplementID), Error> {
        let owner = format!("{class_name}.{}", syntax.name);
        let parameters = self.parameters(&owner, &syntax.parameters)?;

        let mut accessor = AccessorData {
            scope: syntax.scope,
            legacy: self.intern_optional(syntax.legacy.as_deref()),
            legacy_only: syntax.legacy_only,
            ..AccessorData::default()
        };
        self.return_value(&mut accessor, syntax.return_value.as_ref())?;

        let function = FunctionData {
            name: self.intern(&syntax.name),
            class: Some(class),
            function_type: FunctionType::Method,
            is_class: syntax.is_class,
            is_beta: syntax.beta,
            object_is_const: syntax.object_is_const,
            parameters,
            method: Some(accessor),
            getter: None,
            setter: None,
            implement: None,
        };
        let function = self.insert(function);

        let implement = ImplementData {
            full_name: self.intern(&owner),
            class,
            implementing_class: class,
            function,
            is_prop_get: false,
            is_prop_set: false,
            getter: ImplementFlags {
                pure_virtual: syntax.pure_virtual,
                ..ImplementFlags::default()
            },
            setter: ImplementFlags::default(),
            documentation: self.documentation(syntax.documentation.as_ref()),
            getter_documentation: None,
            setter_documentation: None,
        };
        let implement = self.insert(implement);

        self.database.storage.functions[function].implement = Some(implement);

        Ok((function, implement))
    }

    fn property(
        &mut self,
        class: ClassID,
        class_name: &str,
        syntax: &PropertySyntax,
    ) -> Result<(FunctionID, ImplementID), Error> {
        if syntax.get.is_none() && syntax.set.is_none() {
            return Err(Error::EmptyProperty {
                class: class_name.to_owned(),
                name: syntax.name.clone(),
            });
        }

        let owner = format!("{class_name}.{}", syntax.name);
        let keys = self.parameters(&owner, &syntax.keys)?;
        let values = self.parameters(&owner, &syntax.values)?;

        let getter = syntax
            .get
            .as_ref()
            .map(|get| self.property_accessor(&owner, get, &keys, &values))
            .transpose()?;
        let setter = syntax
            .set
            .as_ref()
            .map(|set| self.property_accessor(&owner, set, &keys, &values))
            .transpose()?;

        let function_type = match (&getter, &setter) {
            (Some(_), Some(_)) => FunctionType::Property,
            (Some(_), None) => FunctionType::PropGet,
            (None, _) => FunctionType::PropSet,
        };

        let function = FunctionData {
            name: self.intern(&syntax.name),
            class: Some(class),
            function_type,
            is_class: syntax.is_class,
            is_beta: syntax.beta,
            object_is_const: syntax
                .get
                .as_ref()
                .is_some_and(|get| get.object_is_const),
            parameters: Vec::new(),
            method: None,
            getter,
            setter,
            implement: None,
        };
        let function = self.insert(function);

        let flags = |accessor: Option<&AccessorSyntax>| ImplementFlags {
            pure_virtual: accessor
                .is_some_and(|accessor| accessor.pure_virtual),
            ..ImplementFlags::default()
        };

        let implement = ImplementData {
            full_name: self.intern(&owner),
            class,
            implementing_class: class,
            function,
            is_prop_get: syntax.get.is_some(),
            is_prop_set: syntax.set.is_some(),
            getter: flags(syntax.get.as_ref()),
            setter: flags(syntax.set.as_ref()),
            documentation: self.documentation(syntax.documentation.as_ref()),
            getter_documentation: self.documentation(
                syntax.get.as_ref().and_then(|get| get.documentation.as_ref()),
            ),
            setter_documentation: self.documentation(
                syntax.set.as_ref().and_then(|set| set.documentation.as_ref()),
            ),
        };
        let implement = self.insert(implement);

        self.database.storage.functions[function].implement = Some(implement);

        Ok((function, implement))
    }

    /// Builds one accessor of a property. Keys and values declared on the
    /// accessor replace the shared ones.
    fn property_accessor(
        &mut self,
        owner: &str,
        syntax: &AccessorSyntax,
        keys: &[ParameterID],
        values: &[ParameterID],
    ) -> Result<AccessorData, Error> {
        let keys = match &syntax.keys {
            Some(keys) => self.parameters(owner, keys)?,
            None => keys.to_vec(),
        };
        let values = match &syntax.values {
            Some(values) => self.parameters(owner, values)?,
            None => values.to_vec(),
        };

        let mut accessor = AccessorData {
            scope: syntax.scope,
            legacy: self.intern_optional(syntax.legacy.as_deref()),
            legacy_only: syntax.legacy_only,
            keys,
            values,
            ..AccessorData::default()
        };
        self.return_value(&mut accessor, syntax.return_value.as_ref())?;

        Ok(accessor)
    }

    /// Resolves `Class.Name.function` (or `.function` for the class's own
    /// functions) to the declaring class and the function. The declaring
    /// class must be `class` or one of its ancestors.
    fn resolve_member(
        &mut self,
        class: ClassID,
        reference: &str,
    ) -> Result<(ClassID, FunctionID), Error> {
        let class_name = self.database.storage.classes[class].full_name.clone();

        let (target, function_name) = match reference.strip_prefix('.') {
            Some(function_name) => (class, function_name),
            None => {
                let (target_name, function_name) =
                    reference.rsplit_once('.').ok_or_else(|| {
                        Error::UnknownFunction {
                            class: class_name.to_string(),
                            name: reference.to_owned(),
                        }
                    })?;

                (self.resolve_class(target_name)?, function_name)
            }
        };

        let database: &Database = &*self.database;
        let missing = || Error::UnresolvedClass(class_name.to_string());
        let own = View::new(database, class).ok_or_else(missing)?;
        let declaring = View::new(database, target).ok_or_else(missing)?;

        if target != class
            && !own.inherits_full().any(|base| base.id() == target)
        {
            return Err(Error::NotInherited {
                class: class_name.to_string(),
                inherited: declaring.full_name().to_owned(),
            });
        }

        let function = declaring
            .function_by_name(function_name, FunctionType::Unresolved)
            .ok_or_else(|| Error::UnknownFunction {
                class: declaring.full_name().to_owned(),
                name: function_name.to_owned(),
            })?;

        Ok((target, function.id()))
    }

    /// Returns the dotted name of a function of `class`.
    fn member_name(
        &mut self,
        class: ClassID,
        function: FunctionID,
    ) -> Arc<str> {
        let name = format!(
            "{}.{}",
            self.database.storage.classes[class].full_name,
            self.database.storage.functions[function].name
        );

        self.intern(&name)
    }

    fn explicit_implement(
        &mut self,
        class: ClassID,
        syntax: &ImplementSyntax,
    ) -> Result<Option<ImplementID>, Error> {
        match syntax.name.as_str() {
            "class.constructor" => {
                self.database.storage.classes[class].ctor_enable = true;
                return Ok(None);
            }
            "class.destructor" => {
                self.database.storage.classes[class].dtor_enable = true;
                return Ok(None);
            }
            _ => {}
        }

        let (target, function) = self.resolve_member(class, &syntax.name)?;

        let record = &self.database.storage.functions[function];
        let readable = record.getter.is_some();
        let writable = record.setter.is_some();

        let (is_prop_get, is_prop_set) =
            if record.function_type == FunctionType::Method {
                (false, false)
            } else if !syntax.get && !syntax.set {
                (readable, writable)
            } else {
                (syntax.get, syntax.set)
            };

        if (is_prop_get && !readable) || (is_prop_set && !writable) {
            return Err(Error::UnknownFunction {
                class: self.database.storage.classes[target]
                    .full_name
                    .to_string(),
                name: syntax.name.clone(),
            });
        }

        let flags = ImplementFlags {
            auto: syntax.auto,
            empty: syntax.empty,
            pure_virtual: syntax.pure_virtual,
        };

        let implement = ImplementData {
            full_name: self.member_name(target, function),
            class: target,
            implementing_class: class,
            function,
            is_prop_get,
            is_prop_set,
            getter: if is_prop_set && !is_prop_get {
                ImplementFlags::default()
            } else {
                flags
            },
            setter: if is_prop_set { flags } else { ImplementFlags::default() },
            documentation: self.documentation(syntax.documentation.as_ref()),
            getter_documentation: self
                .documentation(syntax.get_documentation.as_ref()),
            setter_documentation: self
                .documentation(syntax.set_documentation.as_ref()),
        };

        Ok(Some(self.insert(implement)))
    }
}
