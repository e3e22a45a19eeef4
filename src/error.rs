use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// Failures talking to the completion API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode upstream response: {0}")]
    Decode(#[source] reqwest::Error),
}

// Everything /generate can answer with besides 200
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request body")]
    BadBody,

    #[error("invalid JSON format: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("error making upstream request: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("no response received")]
    NoResponse,

    #[error("upstream task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadBody | RelayError::BadJson(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) | RelayError::NoResponse | RelayError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
