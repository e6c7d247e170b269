use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("sheet index is 1-based, got {0}")]
    SheetIndex(usize),

    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: cannot encode '{text}' in {encoding}", path.display())]
    Encode {
        path: PathBuf,
        text: String,
        encoding: &'static str,
    },

    #[error("{}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
