//! Contains the [`Query`] capability and the [`Unit`], a lookup scope over
//! the database.

use crate::{
    class::Class,
    database::{registry::Index, Database},
    declaration::Declaration,
    sequence::Sequence,
    typedecl::Typedecl,
    variable::Variable,
    view::{Entity, View},
};

fn by_name<'db, T: Entity>(
    database: &'db Database,
    index: &Index<T>,
    scope: Option<&str>,
    name: &str,
) -> Option<View<'db, T>> {
    let (id, file) = index.get(name)?;

    if scope.is_some_and(|scope| scope != file) {
        return None;
    }

    View::new(database, id)
}

fn by_file<'db, T: Entity>(
    database: &'db Database,
    index: &'db Index<T>,
    scope: Option<&str>,
    file: &str,
) -> Sequence<'db, View<'db, T>> {
    if scope.is_some_and(|scope| scope != file) {
        return Sequence::empty();
    }

    Sequence::of_ids(database, index.in_file(file))
}

fn all<'db, T: Entity>(
    database: &'db Database,
    index: &'db Index<T>,
    scope: Option<&str>,
) -> Sequence<'db, View<'db, T>> {
    match scope {
        Some(file) => Sequence::of_ids(database, index.in_file(file)),
        None => Sequence::of_ids(database, index.all()),
    }
}

/// The lookups shared by a whole database and by the unit of one file.
///
/// Enumerations yield objects in the order they were declared. A scope
/// limited to one file only finds what that file declares.
pub trait Query {
    /// Returns the database the lookups run against.
    fn database(&self) -> &Database;

    /// Returns the file the lookups are limited to, `None` for the whole
    /// database.
    fn scope(&self) -> Option<&str>;

    /// Looks up a class by its dotted name.
    fn class_by_name(&self, name: &str) -> Option<Class<'_>> {
        let database = self.database();
        by_name(database, &database.registry().classes, self.scope(), name)
    }

    /// Returns the class declared by an interface file.
    fn class_by_file(&self, file: &str) -> Option<Class<'_>> {
        let database = self.database();
        by_file(database, &database.registry().classes, self.scope(), file)
            .next()
    }

    /// Returns every class.
    fn all_classes(&self) -> Sequence<'_, Class<'_>> {
        let database = self.database();
        all(database, &database.registry().classes, self.scope())
    }

    /// Looks up an enum by its dotted name.
    fn enum_by_name(&self, name: &str) -> Option<Typedecl<'_>> {
        let database = self.database();
        by_name(database, &database.registry().enums, self.scope(), name)
    }

    /// Returns the enums declared by a file.
    fn enums_by_file(&self, file: &str) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        by_file(database, &database.registry().enums, self.scope(), file)
    }

    /// Returns every enum.
    fn all_enums(&self) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        all(database, &database.registry().enums, self.scope())
    }

    /// Looks up a struct by its dotted name.
    fn struct_by_name(&self, name: &str) -> Option<Typedecl<'_>> {
        let database = self.database();
        by_name(database, &database.registry().structs, self.scope(), name)
    }

    /// Returns the structs declared by a file.
    fn structs_by_file(&self, file: &str) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        by_file(database, &database.registry().structs, self.scope(), file)
    }

    /// Returns every struct.
    fn all_structs(&self) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        all(database, &database.registry().structs, self.scope())
    }

    /// Looks up an alias (or a function pointer type) by its dotted name.
    fn alias_by_name(&self, name: &str) -> Option<Typedecl<'_>> {
        let database = self.database();
        by_name(database, &database.registry().aliases, self.scope(), name)
    }

    /// Returns the aliases declared by a file.
    fn aliases_by_file(&self, file: &str) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        by_file(database, &database.registry().aliases, self.scope(), file)
    }

    /// Returns every alias.
    fn all_aliases(&self) -> Sequence<'_, Typedecl<'_>> {
        let database = self.database();
        all(database, &database.registry().aliases, self.scope())
    }

    /// Looks up a constant by its dotted name.
    fn constant_by_name(&self, name: &str) -> Option<Variable<'_>> {
        let database = self.database();
        by_name(database, &database.registry().constants, self.scope(), name)
    }

    /// Returns the constants declared by a file.
    fn constants_by_file(&self, file: &str) -> Sequence<'_, Variable<'_>> {
        let database = self.database();
        by_file(database, &database.registry().constants, self.scope(), file)
    }

    /// Returns every constant.
    fn all_constants(&self) -> Sequence<'_, Variable<'_>> {
        let database = self.database();
        all(database, &database.registry().constants, self.scope())
    }

    /// Looks up a global by its dotted name.
    fn global_by_name(&self, name: &str) -> Option<Variable<'_>> {
        let database = self.database();
        by_name(database, &database.registry().globals, self.scope(), name)
    }

    /// Returns the globals declared by a file.
    fn globals_by_file(&self, file: &str) -> Sequence<'_, Variable<'_>> {
        let database = self.database();
        by_file(database, &database.registry().globals, self.scope(), file)
    }

    /// Returns every global.
    fn all_globals(&self) -> Sequence<'_, Variable<'_>> {
        let database = self.database();
        all(database, &database.registry().globals, self.scope())
    }

    /// Looks up a declaration by its dotted name.
    fn declaration_by_name(&self, name: &str) -> Option<Declaration<'_>> {
        let database = self.database();
        by_name(
            database,
            &database.registry().declarations,
            self.scope(),
            name,
        )
    }

    /// Returns the declarations of a file.
    fn declarations_by_file(
        &self,
        file: &str,
    ) -> Sequence<'_, Declaration<'_>> {
        let database = self.database();
        by_file(
            database,
            &database.registry().declarations,
            self.scope(),
            file,
        )
    }

    /// Returns every declaration.
    fn all_declarations(&self) -> Sequence<'_, Declaration<'_>> {
        let database = self.database();
        all(database, &database.registry().declarations, self.scope())
    }
}

/// A lookup scope: either a whole database or one parsed file.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'db> {
    database: &'db Database,
    file: Option<&'db str>,
}

impl<'db> Unit<'db> {
    pub(crate) fn new(database: &'db Database, file: Option<&'db str>) -> Self {
        Self { database, file }
    }

    /// Returns the file the unit is limited to, `None` for a database-wide
    /// unit.
    #[must_use]
    pub fn file(&self) -> Option<&'db str> { self.file }
}

impl Query for Unit<'_> {
    fn database(&self) -> &Database { self.database }

    fn scope(&self) -> Option<&str> { self.file }
}
