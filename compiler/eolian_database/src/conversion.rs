//! Typed conversion of raw bytes and paths into text.
//!
//! Source files and file names arrive as bytes or OS strings; these helpers
//! either produce text or fail with a [`ConversionError`] that says where the
//! input went wrong.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The byte-order mark that some editors put in front of UTF-8 files.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Represents a failure to convert some input into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ConversionError {
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("path `{}` has no valid unicode file name", .0.display())]
    InvalidFileName(PathBuf),
}

/// Decodes the content of a source file.
///
/// A leading UTF-8 byte-order mark is skipped.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidUtf8`] with the offset (counted from the
/// start of `bytes`) of the first byte that is not valid UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String, ConversionError> {
    let (skipped, content) = bytes
        .strip_prefix(UTF8_BOM)
        .map_or((0, bytes), |rest| (UTF8_BOM.len(), rest));

    std::str::from_utf8(content).map(ToOwned::to_owned).map_err(|error| {
        ConversionError::InvalidUtf8 { offset: skipped + error.valid_up_to() }
    })
}

/// Extracts the file name of `path` as text.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidFileName`] if the path has no file name
/// or the file name is not valid unicode.
pub fn file_name(path: &Path) -> Result<&str, ConversionError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ConversionError::InvalidFileName(path.to_path_buf()))
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{decode, file_name, ConversionError};

    #[test]
    fn decode_plain_and_bom() {
        assert_eq!(decode(b"class").unwrap(), "class");
        assert_eq!(decode(b"\xEF\xBB\xBFclass").unwrap(), "class");
    }

    #[test]
    fn decode_reports_offset() {
        assert_eq!(
            decode(b"ab\xFFcd"),
            Err(ConversionError::InvalidUtf8 { offset: 2 })
        );
        assert_eq!(
            decode(b"\xEF\xBB\xBFab\xFF"),
            Err(ConversionError::InvalidUtf8 { offset: 5 })
        );
    }

    #[test]
    fn file_name_of_path() {
        assert_eq!(
            file_name(Path::new("/a/b/efl_loop.eo")).unwrap(),
            "efl_loop.eo"
        );
        assert!(file_name(Path::new("/")).is_err());
    }
}
