// [libs/infra/coordinator-client/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("network error talking to coordinator: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode coordinator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("coordinator rejected credentials")]
    Unauthorized,

    #[error("coordinator returned HTTP {status}: {body}")]
    ServerRejection { status: u16, body: String },

    #[error("retries exhausted calling the coordinator")]
    RetriesExhausted,
}

impl CoordinatorError {
    /// Whether a failed call is worth retrying: network faults, 5xx,
    /// 408 (timeout), and 429 (rate limit).
    pub fn is_retryable(&self) -> bool {
        match self {
            CoordinatorError::Network(e) => !e.is_builder(),
            CoordinatorError::ServerRejection { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejection_retryable_classes() {
        let retryable = [500, 502, 503, 408, 429];
        let not_retryable = [400, 401, 403, 404, 422];

        for status in retryable {
            let err = CoordinatorError::ServerRejection {
                status,
                body: String::new(),
            };
            assert!(err.is_retryable(), "{status} should be retryable");
        }

        for status in not_retryable {
            let err = CoordinatorError::ServerRejection {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "{status} should not be retryable");
        }
    }

    #[test]
    fn unauthorized_is_not_retryable() {
        assert!(!CoordinatorError::Unauthorized.is_retryable());
    }
}
