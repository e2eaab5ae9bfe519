use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not an image: {mime_type}")]
    InvalidMediaType { mime_type: String },

    #[error("image is {size} bytes, limit is {limit}")]
    MediaTooLarge { size: u64, limit: u64 },

    #[error("could not read evidence: {0}")]
    EvidenceUnreadable(#[from] std::io::Error),

    #[error("submission rejected ({status}): {body}")]
    SubmissionRejected { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
