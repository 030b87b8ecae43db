use thiserror::Error;

/// Failures reported by the remote collaborators (oracle and encyclopedia).
///
/// The transport layer sets the variant; retry classification is a pattern
/// match on it rather than an inspection of the message text.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP 429 or a provider quota signal. The only retryable kind.
    #[error("{service} rate limited: {detail}")]
    RateLimited {
        service: &'static str,
        detail: String,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} response could not be decoded: {detail}")]
    Decode {
        service: &'static str,
        detail: String,
    },

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),
}

impl ServiceError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ServiceError::RateLimited { .. })
    }

    /// Map a non-success HTTP status to the matching error kind.
    pub fn from_status(service: &'static str, status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ServiceError::RateLimited {
                service,
                detail: body,
            }
        } else {
            ServiceError::Status {
                service,
                status: status.as_u16(),
                body,
            }
        }
    }
}
