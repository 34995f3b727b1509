use std::fmt::Display;

use anyhow;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T = (), E = AppError> = anyhow::Result<T, E>;

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Malformed or incomplete input. Never touches stored state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no data received")]
    EmptyBody,

    #[error("invalid JSON: {0}")]
    Malformed(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("field must be a string: {0}")]
    WrongType(&'static str),

    #[error("predictedSex must be \"girl\" or \"boy\", got {0:?}")]
    InvalidSex(String),
}

impl ValidationError {
    /// The payload field this error is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        return match self {
            Self::MissingField(field) | Self::EmptyField(field) | Self::WrongType(field) => {
                Some(*field)
            }
            Self::InvalidSex(_) => Some("predictedSex"),
            Self::EmptyBody | Self::Malformed(_) => None,
        };
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
