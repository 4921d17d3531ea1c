use thiserror::Error;

/// All errors produced by trigscan-core.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("fingerprint extraction failed: {0}")]
    Extraction(String),

    #[error("fingerprint comparison failed: {0}")]
    Comparison(String),

    #[error("scratch I/O error: {0}")]
    ScratchIo(#[from] std::io::Error),

    #[error("scan cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScanError {
    /// Extraction and comparison failures are confined to the offset that
    /// produced them; everything else aborts the scan.
    pub(crate) fn is_localized(&self) -> bool {
        matches!(self, ScanError::Extraction(_) | ScanError::Comparison(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
