use thiserror::Error;

#[derive(Error, Debug)]
pub enum CnBinError {
    #[error("Invalid interval: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Error parsing {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CnBinError>;
