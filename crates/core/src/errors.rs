use thiserror::Error;

/// Unified error type for the entire budget-rule-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Category suggestion unavailable: {0}")]
    SuggestionUnavailable(String),

    #[error("Category suggestion unavailable: no suggestion provider configured")]
    NoSuggestionProvider,

    // ── Persistence collaborator ────────────────────────────────────
    #[error("Persistence error: {0}")]
    Persistence(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Ledger file ─────────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Whether repeating the same operation could succeed.
    ///
    /// The core itself never retries; this only tells the caller whether a
    /// retry prompt makes sense. Validation failures need corrected input;
    /// a missing suggestion provider needs a settings change.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence(_)
                | CoreError::Network(_)
                | CoreError::Api { .. }
                | CoreError::SuggestionUnavailable(_)
                | CoreError::FileIO(_)
        )
    }

    /// Fold any store-side failure into `Persistence`, keeping the message.
    pub(crate) fn into_persistence(self) -> Self {
        match self {
            CoreError::Persistence(_) => self,
            other => CoreError::Persistence(other.to_string()),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors can carry the full request URL; strip the query so
        // keys passed as parameters never end up in messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
