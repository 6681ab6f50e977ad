use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("The monthly window must cover at least one month, got {0}")]
    InvalidWindow(u32),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    InternalError(String),
}
