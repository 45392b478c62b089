use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Request to the model timed out after {0} seconds")]
    Timeout(u64),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model API error: {0}")]
    Api(String),

    #[error("Input message too long. Message: {0}")]
    ContextLengthExceeded(String),

    #[error("The model returned no content")]
    EmptyResponse,

    #[error("Failed to render prompt: {0}")]
    Prompt(String),
}
