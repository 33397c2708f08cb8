use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unknown {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl EngineError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        EngineError::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
