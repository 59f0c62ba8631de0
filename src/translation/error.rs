use thiserror::Error;

/// Failure of a single translation attempt.
///
/// `Clone` so one in-flight request can report the same failure to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Empty source text.")]
    EmptyInput,

    #[error("{0}")]
    Config(String),

    #[error("{provider} HTTP {status}")]
    Http { provider: &'static str, status: u16 },

    #[error("Request timed out after {0} seconds.")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    MalformedResponse(String),
}

impl TranslateError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Classifies a reqwest failure, keeping timeouts distinct.
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_decode() {
            Self::MalformedResponse(format!("Invalid response body: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
