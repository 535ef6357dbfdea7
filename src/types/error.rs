//! Error taxonomy
//!
//! Poll failures (`BackendError`) are logged and skipped. Registration
//! failures (`SubmissionError`) become a user-visible notification.

/// A poll or submission could not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Connection refused, timeout, non-2xx status
    #[error("transport failure on {endpoint}: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },
    /// Body was not the JSON shape the endpoint promises
    #[error("malformed response from {endpoint}: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl BackendError {
    pub fn transport(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Transport { endpoint, .. } | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// Registration did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Backend answered `success: false`
    #[error("registration rejected by backend")]
    Rejected,
    /// The request never produced a readable answer
    #[error("registration request failed: {0}")]
    Network(#[from] BackendError),
}

impl SubmissionError {
    /// Text for the transient notification banner
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Rejected => "Registration failed. Please try again.",
            Self::Network(_) => "Network error. Please try again.",
        }
    }
}

/// The speech channel refused an utterance
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to start speech program {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}
