use std::path::PathBuf;

use thiserror::Error;

/// Decode-level failures. Any of these aborts extraction for the whole document.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("cannot load document: {source}")]
    Load {
        #[source]
        source: lopdf::Error,
    },

    #[error("cannot decode content of page {page}: {reason}")]
    Content { page: u32, reason: String },
}

impl IngestError {
    pub fn content(page: u32, reason: impl ToString) -> Self {
        IngestError::Content {
            page,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
