//! The object model of the Eolian interface description language.
//!
//! A [`Session`] owns the library state; a [`Database`] created from it scans
//! directories for interface (`.eo`) and types (`.eot`) files, parses them
//! and exposes everything they declare through read-only [`View`]s:
//! classes with their functions, events, parts, implements and constructors,
//! type declarations, variables, type references and constant expressions.
//!
//! ```no_run
//! use eolian_database::{Query, Session};
//!
//! let session = Session::default();
//! let mut database = session.database();
//!
//! database.directory_scan("/usr/share/eolian/include");
//! database.all_eo_files_parse();
//!
//! if let Some(class) = database.class_by_name("Efl.Loop") {
//!     for base in class.inherits_full() {
//!         println!("{}", base.full_name());
//!     }
//! }
//! ```

pub mod class;
pub mod config;
pub mod conversion;
pub mod database;
pub mod declaration;
pub mod documentation;
pub mod expression;
pub mod frontend;
pub mod function;
pub mod implement;
pub mod intern;
pub mod sequence;
pub mod session;
pub mod syntax;
pub mod r#type;
pub mod typedecl;
pub mod unit;
pub mod variable;
pub mod view;

pub use class::{Class, ClassID, ClassType, Constructor, Event, Part};
pub use config::Config;
pub use database::{Database, Error, FileKind};
pub use declaration::{Declaration, DeclarationType};
pub use documentation::Documentation;
pub use eolian_arena::ID;
pub use expression::{
    BinaryOperator, Expression, ExpressionMask, ExpressionType, Literal, Tree,
    UnaryOperator, Value,
};
pub use frontend::{Frontend, RonFrontend};
pub use function::{
    Function, FunctionType, ObjectScope, Parameter, ParameterDirection,
};
pub use implement::Implement;
pub use r#type::{BuiltinType, Qualifiers, Type, TypeType};
pub use sequence::Sequence;
pub use session::Session;
pub use typedecl::{EnumField, StructField, Typedecl, TypedeclType};
pub use unit::{Query, Unit};
pub use variable::{Variable, VariableType};
pub use view::{Entity, InvalidHandleError, View};
