/// Crate-level error types for mdbind export failures.
use std::path::PathBuf;

/// Every fatal error carries enough context to produce a useful diagnostic
/// without a debugger. Missing referenced files are deliberately absent
/// here: they surface as warnings during assembly and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input document itself cannot be read.
    #[error("cannot read document: {}", path.display())]
    DocumentNotFound {
        /// Path to the unreadable input document.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A configured stylesheet does not exist on disk.
    #[error("stylesheet not found: {}", path.display())]
    StylesheetNotFound {
        /// Path to the missing stylesheet.
        path: PathBuf,
    },

    /// TOML deserialization failed for `.mdbind.toml`.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
