use crate::entry::EntryType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Feature not available: {0}")]
    NotAvailable(String),

    #[error("Failed to observe {entry_type} entries: {message}")]
    Subscription { entry_type: EntryType, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_available<S: Into<String>>(msg: S) -> Self {
        Error::NotAvailable(msg.into())
    }

    pub(crate) fn subscription<S: Into<String>>(entry_type: EntryType, msg: S) -> Self {
        Error::Subscription { entry_type, message: msg.into() }
    }

    pub(crate) fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Error::InvalidData(msg.into())
    }

    #[cfg_attr(not(feature = "web"), allow(dead_code))]
    pub(crate) fn host<S: Into<String>>(msg: S) -> Self {
        Error::Host(msg.into())
    }
}

/// Result type for web-metrics operations
pub type Result<T> = std::result::Result<T, Error>;
