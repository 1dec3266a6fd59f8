use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", upstream_message(.status, .message))]
    Upstream { status: Option<u16>, message: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn upstream_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP error! status: {code}"),
        None => format!("Upstream request failed: {message}"),
    }
}

impl FundingError {
    pub fn status(code: u16) -> Self {
        Self::Upstream {
            status: Some(code),
            message: format!("status {code}"),
        }
    }
}

impl From<reqwest::Error> for FundingError {
    fn from(e: reqwest::Error) -> Self {
        // timeouts and connect failures carry no status
        Self::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FundingError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CollateralError {
    #[error("Invalid symbol format: {0}. Expected format: PF_XXXUSD")]
    InvalidSymbol(String),
}
