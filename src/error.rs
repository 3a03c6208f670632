use thiserror::Error;

/// Every failure the player core can surface. All three are recoverable: the
/// host shows the message and falls back to asking for files manually.
#[derive(Debug, Error)]
pub enum Error {
    /// A default resource could not be fetched (transport failure, non-OK
    /// status, or a missing local default).
    #[error("failed to fetch {resource}: {reason}")]
    Fetch { resource: String, reason: String },

    /// Input that could not be understood: malformed JSON, a JSON document
    /// without a words array, or a timestamp outside the accepted patterns.
    #[error("invalid format: {0}")]
    Format(String),

    /// A file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub fn fetch(resource: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(format!("invalid JSON: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
