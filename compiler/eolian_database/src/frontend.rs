//! Contains the [`Frontend`] seam that turns source text into a
//! [`FileSyntax`].

use std::{fmt::Debug, path::Path};

use ron::extensions::Extensions;
use thiserror::Error;

use crate::syntax::FileSyntax;

/// The error returned by a [`Frontend`].
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Ron(#[from] ron::error::SpannedError),

    /// A failure reported by a frontend other than [`RonFrontend`].
    #[error("{0}")]
    Message(String),
}

/// Reads the source text of one file into its syntax.
pub trait Frontend: Debug + Send + Sync {
    /// Parses `source`, read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing why the text is not a valid file.
    fn parse(&self, path: &Path, source: &str) -> Result<FileSyntax, Error>;
}

/// Reads files written as [RON](https://github.com/ron-rs/ron) documents of
/// [`FileSyntax`]. Optional fields may be written without `Some(...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RonFrontend;

impl Frontend for RonFrontend {
    fn parse(&self, _: &Path, source: &str) -> Result<FileSyntax, Error> {
        Ok(ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(source)?)
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{Error, Frontend, RonFrontend};
    use crate::{
        class::ClassType, database, session::Session, syntax::FileSyntax,
    };

    /// Accepts only empty files.
    #[derive(Debug)]
    struct EmptyOnly;

    impl Frontend for EmptyOnly {
        fn parse(&self, _: &Path, source: &str) -> Result<FileSyntax, Error> {
            if source.trim().is_empty() {
                Ok(FileSyntax::default())
            } else {
                Err(Error::Message("expected an empty file".to_owned()))
            }
        }
    }

    #[test]
    fn reads_minimal_class() {
        let syntax = RonFrontend
            .parse(
                Path::new("foo.eo"),
                r#"(class: (name: "Foo", type: Abstract, inherits: ["Bar"]))"#,
            )
            .unwrap();

        let class = syntax.class.unwrap();
        assert_eq!(class.name, "Foo");
        assert_eq!(class.class_type, ClassType::Abstract);
        assert_eq!(class.inherits, ["Bar"]);
        assert!(syntax.structs.is_empty());
    }

    #[test]
    fn implicit_some_documentation() {
        let syntax = RonFrontend
            .parse(
                Path::new("t.eot"),
                r#"(structs: [(name: "S", documentation: (summary: "s"))])"#,
            )
            .unwrap();

        assert_eq!(
            syntax.structs[0].documentation.as_ref().unwrap().summary,
            "s"
        );
    }

    #[test]
    fn custom_frontend_errors_are_reported() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(directory.path().join("empty.eot"), "\n").unwrap();
        std::fs::write(directory.path().join("full.eot"), "x").unwrap();

        let mut database =
            Session::default().database_with_frontend(EmptyOnly);
        assert!(database.directory_scan(directory.path()));

        assert!(database.try_file_parse("empty.eot").is_ok());

        let error = database.try_file_parse("full.eot").unwrap_err();
        let database::Error::Frontend { file, source } = error else {
            panic!("expected a frontend error");
        };
        assert_eq!(file, "full.eot");
        assert!(matches!(
            source,
            Error::Message(message) if message == "expected an empty file"
        ));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(RonFrontend.parse(Path::new("x.eo"), "(class: ").is_err());
    }
}
