// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Nothing in this crate propagates an error to the caller of
/// `Worker::start` - every failure is terminal to the single iteration or
/// single message that produced it and is reported via logging only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("transport error: {0}")]
    Transport(#[from] crate::port::TransportError),

    #[error("handler error: {0}")]
    Handler(#[from] crate::port::HandlerError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
