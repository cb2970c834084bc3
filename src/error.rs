//! Error types for table ingestion

/// Errors raised while building a table from caller-supplied data.
///
/// Rendering never fails; every variant here is an ingestion-time rejection.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A row has an empty `id`.
    #[error("row at {path} has an empty id")]
    MissingId { path: String },

    /// Two siblings share the same `id`.
    #[error("duplicate row id '{id}' under {parent}")]
    DuplicateId { id: String, parent: String },

    /// Two columns share the same `key`.
    #[error("duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// The dataset document could not be parsed.
    #[error("failed to parse dataset: {message}")]
    Parse { message: String },
}

impl TableError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for TableError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(err.to_string())
    }
}
