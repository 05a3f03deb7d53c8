use reqwest::StatusCode;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API request failed with {}: {}", status_code, message)]
    Api {
        status_code: StatusCode,
        message: String,
    },

    #[error("Failed to log in - server responded with {}: {}", status_code, message)]
    SignIn {
        status_code: StatusCode,
        message: String,
    },

    #[error("Metadata query failed: {}", messages.join("; "))]
    Query { messages: Vec<String> },

    #[error("Invalid endpoint `{}`", endpoint)]
    BadEndpoint { endpoint: Url },

    #[error("Bad token: the session token is not a valid header value")]
    BadToken,

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Could not parse JSON response.")]
    BadJsonResponse(#[source] serde_json::Error),

    #[error(
        "Status code {} inconsistent with response payload: {}",
        status_code,
        message
    )]
    BadProtocol {
        status_code: StatusCode,
        message: String,
    },

    #[error("Failed to initialise the HTTP client")]
    BuildHttpClient(#[source] reqwest::Error),

    #[error("HTTP request error: {}", message)]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },
}
