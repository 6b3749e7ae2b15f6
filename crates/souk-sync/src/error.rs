use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("send failed: {0}")]
    Send(String),
    #[error("logging initialization failed: {0}")]
    Logging(String),
}
