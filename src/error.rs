//! Error type shared by every module of the crate.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A trajectory violated the input contract of a pose computation.
    /// `index` is the offending pose, or the trajectory length when it is too short.
    #[error("invalid input at pose {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A factor references a key that has no initial value.
    #[error("factor references unknown key {0}")]
    MissingKey(u32),

    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("plotting error: {0}")]
    Plot(String),
}

impl Error {
    pub(crate) fn invalid_input(index: usize, reason: impl Into<String>) -> Error {
        Error::InvalidInput {
            index,
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Error {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }
}

// plotters errors are generic over the backend error, keep only the message
impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(err.to_string())
    }
}
