use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// An internal-slot operation (e.g. reading a date's time value) was
    /// applied to an object without that slot.
    #[error("receiver is not a {expected} object")]
    IncompatibleReceiver { expected: &'static str },
    #[error("value is not a constructor")]
    NotConstructor,
    #[error("constructor requires {required} argument(s)")]
    RequiresArguments { required: usize },
    #[error("cyclic prototype chain")]
    PrototypeCycle,
}
