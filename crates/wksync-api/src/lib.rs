pub mod client;
pub mod transport;
pub mod types;

pub use client::{PushOutcome, StudyMaterial, WaniKaniClient};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, RateLimited, Transport};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}
