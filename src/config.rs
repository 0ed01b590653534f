use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::AssembleMode;

/// Project configuration loaded from `.mdbind.toml`.
/// Carries an optional extra stylesheet and the default assembly mode.
pub struct Config {
    stylesheet: Option<PathBuf>,
    toc: bool,
}

/// Raw TOML structure for `.mdbind.toml`.
#[derive(serde::Deserialize)]
struct MdbindTomlConfig {
    #[serde(default)]
    stylesheet: Option<PathBuf>,
    #[serde(default)]
    toc: bool,
}

impl Config {
    /// Load config from `.mdbind.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".mdbind.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: MdbindTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            stylesheet: raw.stylesheet,
            toc: raw.toc,
        })
    }

    /// Default config: built-in stylesheet only, inline-anchor assembly.
    fn defaults() -> Self {
        Self {
            stylesheet: None,
            toc: false,
        }
    }

    /// Extra stylesheet appended after the built-in one.
    pub fn stylesheet(&self) -> Option<&Path> {
        self.stylesheet.as_deref()
    }

    /// Assembly mode implied by the config and the command-line flag.
    /// The flag wins when set.
    pub fn assemble_mode(&self, toc_flag: bool) -> AssembleMode {
        if toc_flag || self.toc {
            AssembleMode::TableOfContents
        } else {
            AssembleMode::InlineAnchors
        }
    }
}
