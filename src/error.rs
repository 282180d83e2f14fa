use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid length: expected {0} bytes, found {1} bytes")]
    BadLength(usize, usize),
    #[error("Malformed signature: expected {expected} bytes, found {found} bytes")]
    MalformedSignature { expected: usize, found: usize },
    #[error("Signature verification failed: {0}")]
    VerificationFailed(#[from] VerificationError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("recomputed hypertree root does not match the public root")]
    RootMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;
