//! The unified error handling system for the client.

// 1. Core Types
pub use storage::StorageError;
pub use types::ClientError;

/// A unified `Result` type for the entire client.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, ClientError>;

// 2. Module declarations
pub mod macros;
pub mod storage;
pub mod types;

// 3. Context Trait for adding context to errors.
pub trait Context<T, E> {
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<ClientError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let context_message = context().to_string();
                Err(ClientError::Context {
                    context: context_message,
                    source: Box::new(error.into()),
                })
            }
        }
    }
}

// 4. Error Category for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the caller (bad input, rejected credentials).
    /// Corresponds to 4xx HTTP status codes and client-side validation.
    Caller,
    /// Errors caused by the backend, the identity provider or the transport.
    Remote,
    /// Local persistence is unavailable; requests degrade to unauthenticated.
    Storage,
}

#[cfg(test)]
mod tests;
