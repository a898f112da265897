//! Contains the [`Config`] of a session.

use std::path::{Path, PathBuf};

use getset::Getters;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The environment variable that replaces the configured system directories.
/// It holds a platform path list, like `PATH`.
pub const SYSTEM_DIRECTORIES_VARIABLE: &str = "EOLIAN_SYSTEM_DIRECTORIES";

/// The error type for loading a [`Config`].
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

/// Settings shared by every database of a session.
#[derive(
    Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Config {
    /// The directories scanned by `system_directory_scan`.
    #[get = "pub"]
    system_directories: Vec<PathBuf>,

    /// The extension of interface files, without the dot.
    #[get = "pub"]
    interface_extension: String,

    /// The extension of types files, without the dot.
    #[get = "pub"]
    types_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_directories: vec![PathBuf::from(
                "/usr/share/eolian/include",
            )],
            interface_extension: "eo".to_owned(),
            types_extension: "eot".to_owned(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text. Omitted keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialize`] if the text is not a valid
    /// configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Deserialize`] if its content is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if the configuration cannot be rendered.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replaces the system directories.
    #[must_use]
    pub fn with_system_directories(
        mut self,
        directories: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        self.system_directories = directories.into_iter().collect();
        self
    }

    /// Replaces the file extensions of interface and types files.
    #[must_use]
    pub fn with_extensions(
        mut self,
        interface: impl Into<String>,
        types: impl Into<String>,
    ) -> Self {
        self.interface_extension = interface.into();
        self.types_extension = types.into();
        self
    }

    /// Applies [`SYSTEM_DIRECTORIES_VARIABLE`] if it is set.
    #[must_use]
    pub fn with_environment(self) -> Self {
        match std::env::var_os(SYSTEM_DIRECTORIES_VARIABLE) {
            Some(value) => {
                self.with_system_directories(std::env::split_paths(&value))
            }
            None => self,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.interface_extension(), "eo");
        assert_eq!(config.types_extension(), "eot");
        assert_eq!(config.system_directories().len(), 1);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config =
            Config::from_toml_str("system_directories = [\"/opt/eolian\"]\n")
                .unwrap();

        assert_eq!(config.system_directories(), &[PathBuf::from(
            "/opt/eolian"
        )]);
        assert_eq!(config.interface_extension(), "eo");
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default()
            .with_extensions("eo2", "eot2")
            .with_system_directories([
                PathBuf::from("/a"),
                PathBuf::from("/b"),
            ]);

        let text = config.to_toml_string().unwrap();

        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("eolian.toml");
        std::fs::write(&path, "types_extension = \"types\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.types_extension(), "types");
        assert!(Config::load(&directory.path().join("missing.toml")).is_err());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml_str("interface_extension = 5").is_err());
    }
}
