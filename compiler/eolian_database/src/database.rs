//! Contains the [`Database`], the owner of every object parsed from interface
//! and types files.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use eolian_arena::{Arena, ID};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{
    class::{ClassData, ConstructorData, EventData, PartData},
    conversion::{self, ConversionError},
    declaration::DeclarationData,
    documentation::DocumentationData,
    expression::{ExpressionData, ParseError},
    frontend::{self, Frontend},
    function::{FunctionData, ParameterData},
    implement::ImplementData,
    intern::Interner,
    r#type::TypeData,
    sequence::Sequence,
    session::Session,
    typedecl::{EnumFieldData, StructFieldData, TypedeclData},
    unit::{Query, Unit},
    variable::VariableData,
    view::{Entity, InvalidHandleError, View},
};

mod building;
pub(crate) mod registry;

#[cfg(test)]
mod test;

use registry::Registry;

/// The error type of the database operations.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("no scanned file is named `{0}`")]
    UnknownFile(String),

    #[error("`{}` is neither an interface nor a types file", .0.display())]
    UnsupportedFile(PathBuf),

    #[error(
        "`{}` has the same file name as the already known `{}`",
        path.display(),
        existing.display()
    )]
    ShadowedFile { path: PathBuf, existing: PathBuf },

    #[error("failed to decode `{}`: {source}", path.display())]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },

    #[error("failed to read `{file}`: {source}")]
    Frontend {
        file: String,
        #[source]
        source: frontend::Error,
    },

    #[error("interface file `{0}` does not declare a class")]
    MissingClass(String),

    #[error("types file `{0}` declares a class")]
    UnexpectedClass(String),

    #[error("`{name}` is already declared in `{file}`")]
    Redefinition { name: String, file: String },

    #[error("unknown type `{0}`")]
    UnresolvedType(String),

    #[error("unknown class `{0}`")]
    UnresolvedClass(String),

    #[error("class `{class}` has no function `{name}`")]
    UnknownFunction { class: String, name: String },

    #[error("`{owner}` declares `{name}` more than once")]
    DuplicateMember { owner: String, name: String },

    #[error("property `{class}.{name}` has neither a getter nor a setter")]
    EmptyProperty { class: String, name: String },

    #[error("`{class}` does not inherit `{inherited}`")]
    NotInherited { class: String, inherited: String },

    #[error("invalid type `{name}`: {reason}")]
    InvalidType { name: String, reason: String },

    #[error("invalid expression `{text}` in `{file}`: {source}")]
    Expression {
        text: String,
        file: String,
        #[source]
        source: ParseError,
    },

    #[error("a dependency of `{file}` failed: {source}")]
    Dependency {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

/// The two disjoint kinds of source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// An interface file declaring exactly one class.
    Interface,

    /// A types file declaring no class.
    Types,
}

/// The arenas holding every record of a [`Database`].
#[derive(Debug, Default)]
pub struct Storage {
    pub(crate) classes: Arena<ClassData>,
    pub(crate) parts: Arena<PartData>,
    pub(crate) constructors: Arena<ConstructorData>,
    pub(crate) events: Arena<EventData>,
    pub(crate) functions: Arena<FunctionData>,
    pub(crate) parameters: Arena<ParameterData>,
    pub(crate) implements: Arena<ImplementData>,
    pub(crate) types: Arena<TypeData>,
    pub(crate) typedecls: Arena<TypedeclData>,
    pub(crate) struct_fields: Arena<StructFieldData>,
    pub(crate) enum_fields: Arena<EnumFieldData>,
    pub(crate) expressions: Arena<ExpressionData>,
    pub(crate) variables: Arena<VariableData>,
    pub(crate) declarations: Arena<DeclarationData>,
    pub(crate) documentation: Arena<DocumentationData>,
    pub(crate) interner: Interner,
}

#[derive(Debug, Clone)]
struct ScannedFile {
    path: PathBuf,
    kind: FileKind,
}

/// The container of everything parsed within a [`Session`].
///
/// Files are known by their file name (`efl_loop.eo`) once a directory has
/// been scanned. Parsing a file loads the files it depends on first; a file
/// that fails to build leaves nothing of its own behind.
#[derive(Debug)]
pub struct Database {
    session: Session,
    frontend: Box<dyn Frontend>,
    storage: Storage,
    registry: Registry,
    files: HashMap<Arc<str>, ScannedFile>,
    interface_files: Vec<Arc<str>>,
    types_files: Vec<Arc<str>>,
    parsed: HashSet<Arc<str>>,
    in_progress: HashSet<Arc<str>>,
}

impl Database {
    pub(crate) fn new(session: Session, frontend: Box<dyn Frontend>) -> Self {
        Self {
            session,
            frontend,
            storage: Storage::default(),
            registry: Registry::default(),
            files: HashMap::new(),
            interface_files: Vec::new(),
            types_files: Vec::new(),
            parsed: HashSet::new(),
            in_progress: HashSet::new(),
        }
    }

    pub(crate) fn storage(&self) -> &Storage { &self.storage }

    pub(crate) fn registry(&self) -> &Registry { &self.registry }

    /// Returns the session the database was created from.
    #[must_use]
    pub fn session(&self) -> &Session { &self.session }

    /// Resolves a handle into a view.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHandleError`] if the object was rolled back or the
    /// handle belongs to another database.
    pub fn view<T: Entity>(
        &self,
        id: ID<T>,
    ) -> Result<View<'_, T>, InvalidHandleError> {
        View::new(self, id).ok_or_else(|| InvalidHandleError::of(id))
    }

    /// Returns the database-wide lookup scope.
    #[must_use]
    pub fn unit(&self) -> Unit<'_> { Unit::new(self, None) }

    /// Returns the lookup scope of a parsed file.
    #[must_use]
    pub fn unit_for_file(&self, name: &str) -> Option<Unit<'_>> {
        self.parsed.get(name).map(|file| Unit::new(self, Some(&**file)))
    }

    /// Whether the file with the given name has been parsed successfully.
    #[must_use]
    pub fn is_parsed(&self, name: &str) -> bool { self.parsed.contains(name) }

    fn file_kind(&self, path: &Path) -> Option<FileKind> {
        let extension = path.extension()?.to_str()?;
        let config = self.session.config();

        if extension == config.interface_extension() {
            Some(FileKind::Interface)
        } else if extension == config.types_extension() {
            Some(FileKind::Types)
        } else {
            None
        }
    }

    /// Records a source file. A file name seen before keeps its first path.
    fn register_file(
        &mut self,
        path: &Path,
    ) -> Result<Option<Arc<str>>, Error> {
        let Some(kind) = self.file_kind(path) else {
            return Ok(None);
        };

        let name = conversion::file_name(path).map_err(|source| {
            Error::Conversion { path: path.to_path_buf(), source }
        })?;

        if let Some(existing) = self.files.get(name) {
            if existing.path != path {
                warn!(
                    "ignoring `{}`: `{}` has the same file name",
                    path.display(),
                    existing.path.display()
                );
            }

            return Ok(self.storage.interner.get(name));
        }

        let name = self.storage.interner.intern(name);

        match kind {
            FileKind::Interface => self.interface_files.push(name.clone()),
            FileKind::Types => self.types_files.push(name.clone()),
        }

        self.files.insert(name.clone(), ScannedFile {
            path: path.to_path_buf(),
            kind,
        });

        Ok(Some(name))
    }

    /// Fails if a different file with the same file name is already known.
    fn check_shadowing(&self, path: &Path) -> Result<(), Error> {
        let Ok(name) = conversion::file_name(path) else {
            return Ok(());
        };
        let Some(existing) = self.files.get(name) else {
            return Ok(());
        };

        let same = existing.path == path
            || std::fs::canonicalize(&existing.path)
                .ok()
                .zip(std::fs::canonicalize(path).ok())
                .is_some_and(|(existing, path)| existing == path);

        if same {
            Ok(())
        } else {
            Err(Error::ShadowedFile {
                path: path.to_path_buf(),
                existing: existing.path.clone(),
            })
        }
    }

    fn scan(&mut self, directory: &Path) -> Result<(), Error> {
        let io = |source| Error::Io { path: directory.to_path_buf(), source };

        let mut entries = std::fs::read_dir(directory)
            .map_err(io)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io)?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.scan(&path)?;
            } else {
                self.register_file(&path)?;
            }
        }

        Ok(())
    }

    /// Scans a directory recursively for interface and types files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if `directory` is not a directory and
    /// [`Error::Io`] if it cannot be listed.
    pub fn try_directory_scan(
        &mut self,
        directory: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let directory = directory.as_ref();

        if !directory.is_dir() {
            return Err(Error::NotADirectory(directory.to_path_buf()));
        }

        debug!("scanning `{}`", directory.display());
        self.scan(directory)
    }

    /// Scans a directory recursively, returning whether it succeeded. The
    /// failure is logged.
    pub fn directory_scan(&mut self, directory: impl AsRef<Path>) -> bool {
        report(self.try_directory_scan(directory))
    }

    /// Scans the system directories of the session's configuration. Missing
    /// directories are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error`] met while scanning an existing directory.
    pub fn try_system_directory_scan(&mut self) -> Result<(), Error> {
        let directories = self.session.config().system_directories().clone();

        for directory in directories {
            if directory.is_dir() {
                self.try_directory_scan(&directory)?;
            } else {
                debug!(
                    "skipping missing system directory `{}`",
                    directory.display()
                );
            }
        }

        Ok(())
    }

    /// Scans the system directories, returning whether it succeeded.
    pub fn system_directory_scan(&mut self) -> bool {
        report(self.try_system_directory_scan())
    }

    fn parse_named(&mut self, name_or_path: &str) -> Result<Arc<str>, Error> {
        let path = Path::new(name_or_path);

        let name = if path.is_file() {
            self.check_shadowing(path)?;
            self.register_file(path)?
                .ok_or_else(|| Error::UnsupportedFile(path.to_path_buf()))?
        } else {
            self.scanned_file(name_or_path)
                .ok_or_else(|| Error::UnknownFile(name_or_path.to_owned()))?
        };

        self.parse_file(&name)?;

        Ok(name)
    }

    /// Parses a file, given either by its scanned file name or by a path, and
    /// every file it depends on. Parsing an already parsed file returns its
    /// unit again.
    ///
    /// # Errors
    ///
    /// Returns the [`Error`] that stopped the file from building; nothing
    /// of the failed file remains in the database.
    pub fn try_file_parse(
        &mut self,
        name_or_path: &str,
    ) -> Result<Unit<'_>, Error> {
        let name = self.parse_named(name_or_path)?;

        self.unit_for_file(&name)
            .ok_or_else(|| Error::UnknownFile(name_or_path.to_owned()))
    }

    /// Parses a file and its dependencies, returning its unit or `None` on
    /// failure. The failure is logged.
    pub fn file_parse(&mut self, name_or_path: &str) -> Option<Unit<'_>> {
        match self.parse_named(name_or_path) {
            Ok(name) => self.unit_for_file(&name),
            Err(err) => {
                error!("{err}");
                None
            }
        }
    }

    fn parse_all(&mut self, kind: FileKind) -> Result<(), Vec<Error>> {
        let names = match kind {
            FileKind::Interface => self.interface_files.clone(),
            FileKind::Types => self.types_files.clone(),
        };

        let errors = names
            .iter()
            .filter_map(|name| self.parse_file(name).err())
            .collect::<Vec<_>>();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Parses every scanned interface file. Every file is attempted even
    /// after a failure.
    ///
    /// # Errors
    ///
    /// Returns the errors of every file that failed.
    pub fn try_all_eo_files_parse(&mut self) -> Result<(), Vec<Error>> {
        self.parse_all(FileKind::Interface)
    }

    /// Parses every scanned interface file, returning whether all of them
    /// succeeded. Failures are logged.
    pub fn all_eo_files_parse(&mut self) -> bool {
        report_all(self.try_all_eo_files_parse())
    }

    /// Parses every scanned types file. Every file is attempted even after a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the errors of every file that failed.
    pub fn try_all_eot_files_parse(&mut self) -> Result<(), Vec<Error>> {
        self.parse_all(FileKind::Types)
    }

    /// Parses every scanned types file, returning whether all of them
    /// succeeded. Failures are logged.
    pub fn all_eot_files_parse(&mut self) -> bool {
        report_all(self.try_all_eot_files_parse())
    }

    fn paths(&self, names: &'_ [Arc<str>]) -> Vec<&Path> {
        names
            .iter()
            .filter_map(|name| self.files.get(name))
            .map(|file| file.path.as_path())
            .collect()
    }

    /// Returns the paths of the scanned interface files in scan order.
    #[must_use]
    pub fn all_eo_file_paths(&self) -> Sequence<'_, &Path> {
        Sequence::new(self.paths(&self.interface_files).into_iter())
    }

    /// Returns the paths of the scanned types files in scan order.
    #[must_use]
    pub fn all_eot_file_paths(&self) -> Sequence<'_, &Path> {
        Sequence::new(self.paths(&self.types_files).into_iter())
    }

    /// Returns the names of the scanned interface files in scan order.
    #[must_use]
    pub fn all_eo_files(&self) -> Sequence<'_, &str> {
        Sequence::new(self.interface_files.iter().map(|name| &**name))
    }

    /// Returns the names of the scanned types files in scan order.
    #[must_use]
    pub fn all_eot_files(&self) -> Sequence<'_, &str> {
        Sequence::new(self.types_files.iter().map(|name| &**name))
    }

    /// Returns the name of the scanned file with the given name, if any.
    pub(crate) fn scanned_file(&self, name: &str) -> Option<Arc<str>> {
        self.storage
            .interner
            .get(name)
            .filter(|name| self.files.contains_key(name))
    }

    /// Reads, checks and builds one scanned file. Files that are parsed or
    /// currently being built are skipped.
    pub(crate) fn parse_file(&mut self, name: &Arc<str>) -> Result<(), Error> {
        if self.parsed.contains(name) || self.in_progress.contains(name) {
            return Ok(());
        }

        let ScannedFile { path, kind } = self
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownFile(name.to_string()))?;

        let bytes = std::fs::read(&path)
            .map_err(|source| Error::Io { path: path.clone(), source })?;
        let source = conversion::decode(&bytes).map_err(|source| {
            Error::Conversion { path: path.clone(), source }
        })?;
        let syntax = self
            .frontend
            .parse(&path, &source)
            .map_err(|source| Error::Frontend {
                file: name.to_string(),
                source,
            })?;

        debug!("building `{name}`");

        self.in_progress.insert(name.clone());
        let result =
            building::Builder::new(self, name.clone(), kind).build(&syntax);
        self.in_progress.remove(name);

        match result {
            Ok(()) => {
                info!("parsed `{name}`");
                self.parsed.insert(name.clone());
                Ok(())
            }
            Err(err) => {
                warn!("rolled back `{name}`");
                Err(err)
            }
        }
    }
}

impl Query for Database {
    fn database(&self) -> &Database { self }

    fn scope(&self) -> Option<&str> { None }
}

fn report(result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            error!("{err}");
            false
        }
    }
}

fn report_all(result: Result<(), Vec<Error>>) -> bool {
    match result {
        Ok(()) => true,
        Err(errors) => {
            for err in errors {
                error!("{err}");
            }
            false
        }
    }
}
