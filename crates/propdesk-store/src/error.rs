/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading from or writing to the backing medium failed.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value couldn't be turned into JSON, or the backing file holds
    /// something that isn't a JSON object of strings.
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
