use thiserror::Error;

/// Result type alias using [`CardError`].
pub type CardResult<T> = Result<T, CardError>;

/// Everything that can go wrong while producing a weather card.
#[derive(Debug, Error)]
pub enum CardError {
    /// The weather API call failed, returned an error status, or its body
    /// did not match the expected shape.
    #[error("Upstream weather API error: {0}")]
    Upstream(String),

    /// An icon image could not be fetched or decoded.
    #[error("Failed to load icon '{url}': {reason}")]
    AssetLoad { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl CardError {
    pub fn asset_load(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoad { url: url.into(), reason: reason.to_string() }
    }
}
