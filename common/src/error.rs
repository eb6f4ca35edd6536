use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Signal length mismatch: {bars} bars but {signals} signals")]
    SignalLengthMismatch { bars: usize, signals: usize },

    #[error("Bar sequence is empty")]
    EmptyBars,

    #[error("Bar timestamps must be strictly increasing: violation at index {index}")]
    UnorderedBars { index: usize },

    #[error("Equity curve is empty")]
    EmptyEquityCurve,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BacktestError>;
