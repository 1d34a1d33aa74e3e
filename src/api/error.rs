//! Error types for list fetches and request dispatch

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a [`Dispatcher`](super::dispatch::Dispatcher)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {code} - {body}")]
    Status { code: u16, body: String },

    #[error("Mock fixture error: {0}")]
    Fixture(String),
}

impl DispatchError {
    /// Whether the service itself refused the call for throttling reasons
    pub fn is_server_throttled(&self) -> bool {
        matches!(self, DispatchError::Status { code: 503, .. })
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => DispatchError::Status {
                code: status.as_u16(),
                body: error.to_string(),
            },
            None => DispatchError::Network(error.to_string()),
        }
    }
}

/// Failure of a fetch cycle
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// A required parameter was missing or a setter got invalid input; nothing was sent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The throttle governor had no budget left for the group; nothing was sent
    #[error("Throttled on group '{group}', restores one request every {restore_interval:?}")]
    Throttled {
        group: String,
        restore_interval: Duration,
    },

    #[error("Transport failure: {0}")]
    Transport(#[from] DispatchError),

    /// The response body could not be walked at all
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_throttled(&self) -> bool {
        matches!(self, FetchError::Throttled { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, FetchError::Configuration(_))
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Throttled {
            group: "GetReportList".to_string(),
            restore_interval: Duration::from_secs(60),
        };
        assert!(err.to_string().contains("GetReportList"));
        assert!(err.is_throttled());

        let err: FetchError = DispatchError::Status { code: 503, body: "slow down".into() }.into();
        assert!(matches!(err, FetchError::Transport(ref d) if d.is_server_throttled()));
    }
}
