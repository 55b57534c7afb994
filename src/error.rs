use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirError {
    #[error("memory segment not found: {0}")]
    SegmentNotFound(String),

    #[error("unknown dynamic parameter: {0}")]
    UnknownDynamicParam(String),

    #[error("missing dynamic parameter: {0}")]
    MissingDynamicParam(String),

    #[error("invalid step count: {0}")]
    InvalidStepCount(String),

    #[error("invalid range check bounds: {0}")]
    InvalidRangeCheckBounds(String),

    #[error("trace generator mismatch: {0}")]
    GeneratorMismatch(String),

    #[error("interaction elements already set")]
    InteractionAlreadySet,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AirError>;
