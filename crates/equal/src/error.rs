use thiserror::Error;
use whether_object_model::ObjectError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The reference constructor cannot be invoked without meaningful
    /// arguments.
    #[error("cannot build reference instance: {0}")]
    Construct(#[from] ObjectError),
}
