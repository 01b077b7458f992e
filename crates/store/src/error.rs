use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the flat-file store.
///
/// An absent collection file is not an error; `load` treats it as an empty
/// collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read collection file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write collection file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed collection file {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode collection for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
