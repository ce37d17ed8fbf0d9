use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Q-table I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Q-table snapshot is malformed: {0}")]
    Snapshot(#[from] serde_json::Error),
}
