use std::path::PathBuf;

use thiserror::Error;

/// Library error type for slideview operations.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more supplied roots are missing or unreadable.
    #[error("invalid path: {0}")]
    BadPath(String),

    /// The backend could not open an image file.
    #[error("cannot open image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A key binding names an action that does not exist.
    #[error("unknown action '{0}' in key bindings")]
    UnknownAction(String),

    /// Two actions are bound to the same key token.
    #[error("duplicate key binding '{0}'")]
    DuplicateKey(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
