//! Error types for the tagged codec.

use thiserror::Error;

/// Errors surfaced by registration, decoding and the wire-text entry points.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A transformer with this code is already registered. Raised at
    /// [`register`](crate::TypeCodec::register) time; the registry is left
    /// unchanged.
    #[error("transformer code '{code}' already registered for '{existing}'")]
    DuplicateTransformer { code: String, existing: &'static str },

    /// A tagged wrapper referenced a code with no registry entry. The value
    /// cannot be partially decoded, so no fallback is substituted.
    #[error("unknown transformer {0}")]
    UnknownTransformer(String),

    /// A tagged wrapper's payload did not match the shape its transformer
    /// expects.
    #[error("invalid payload for transformer '{name}': {reason}")]
    InvalidPayload { name: &'static str, reason: String },

    /// The tree still holds a value JSON cannot carry natively; it was not
    /// claimed by any registered transformer during encoding.
    #[error("value has no JSON representation: {0}")]
    Unrepresentable(&'static str),

    /// Wire-text syntax error, passed through from the JSON parser.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
