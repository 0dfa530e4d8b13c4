#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Store rejected command: {0}")]
    Store(String),

    #[error("Report failed with: {0}")]
    Report(String),
}
