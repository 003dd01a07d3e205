use thiserror::Error;

// ── Error taxonomy ────────────────────────────────────────────────────────────

/// Failure modes of the aggregation pipeline.
///
/// Extraction problems are deliberately absent: a document that yields no
/// usable data produces an empty partial result, never an error.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Transport failure or a non-2xx upstream status.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Response body could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The configured handle never produced a channel id.
    #[error("could not resolve channel id for @{0}")]
    Resolution(String),

    /// The structured stats API answered with a non-success status.
    #[error("stats api: {0}")]
    Api(String),

    /// Required environment variable is missing or empty.
    #[error("missing configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChannelError::Decode(e.to_string())
        } else {
            ChannelError::Fetch(e.to_string())
        }
    }
}
