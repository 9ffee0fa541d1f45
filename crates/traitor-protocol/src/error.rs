//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding protocol messages.
///
/// Each crate in the workspace keeps its own error enum, so a
/// `ProtocolError` always means a serialization problem, never a game
/// rule or a lobby lookup.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown `kind`/`action` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
