use thiserror::Error;

/// Errors reported by a chat transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport rejected the request as malformed (HTTP 400).
    ///
    /// Covers markup the renderer cannot parse as well as edits that would
    /// not change the message.
    #[error("bad request: {description}")]
    BadRequest { description: String },

    /// Any other error reported by the transport API.
    #[error("transport API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl TransportError {
    /// Whether this is a render rejection that a plain-text resend can recover.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, TransportError::BadRequest { .. })
    }

    /// Whether an edit was rejected because the text did not change.
    pub fn is_not_modified(&self) -> bool {
        match self {
            TransportError::BadRequest { description } => description
                .to_lowercase()
                .contains("message is not modified"),
            _ => false,
        }
    }
}
