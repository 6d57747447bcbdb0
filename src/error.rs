use reqwest::StatusCode;
use thiserror::Error;

/// Why a single lookup stage failed. Never leaves the resolver: each public
/// operation turns it into `None` or a sentinel after logging it.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("unusable response: {0}")]
    Payload(String),

    #[error("provider reported failure: {0}")]
    Provider(String),

    #[error("ipinfo: {0}")]
    IpInfo(String),
}

