use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Load(#[from] mcasm::Error),

    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    #[error("Label '{0}' not found")]
    LabelNotFound(String),

    #[error("Execution limit exceeded (possible infinite loop)")]
    LimitExceeded(u64),

    #[error("Error executing '{code}': {source}")]
    Exec { code: String, source: Box<Error> },
}
