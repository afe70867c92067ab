use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Position outside the board")]
    OutOfBounds,
    #[error("Malformed argument")]
    InvalidArgument,
}

pub type Result<T> = core::result::Result<T, FieldError>;
