// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Outcome of an operation: a value, or a failure with a message and/or a cause

use std::fmt;
use std::sync::Arc;

/// Underlying error attached to a [`Failure`]
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Result type produced by every managed operation
pub type Outcome<A> = Result<A, Failure>;

/// Separator placed between an added message and the existing one
pub const MESSAGE_SEPARATOR: &str = ": ";

/// A failed outcome
///
/// Always carries a message, a cause, or both; the constructors are the
/// only way to build one.
#[derive(Debug, Clone)]
pub struct Failure {
    message: Option<String>,
    cause: Option<Cause>,
}

impl Failure {
    /// A failure described only by a message (validation failures)
    pub fn message<M: Into<String>>(message: M) -> Self {
        Self {
            message: Some(message.into()),
            cause: None,
        }
    }

    /// A failure with context and the error that triggered it
    pub fn error<M, E>(message: M, cause: E) -> Self
    where
        M: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: Some(message.into()),
            cause: Some(Arc::new(cause)),
        }
    }

    /// A failure carrying only its cause
    pub fn exception<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: None,
            cause: Some(Arc::new(cause)),
        }
    }

    #[must_use]
    pub fn get_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Replace the message, discarding any earlier context
    #[must_use]
    pub fn set_message<M: Into<String>>(mut self, message: M) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Prepend context to the existing message
    #[must_use]
    pub fn add_message<M: Into<String>>(mut self, message: M) -> Self {
        let message = message.into();
        self.message = Some(match self.message.take() {
            Some(existing) => format!("{message}{MESSAGE_SEPARATOR}{existing}"),
            None => message,
        });
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.cause) {
            (Some(message), Some(cause)) => write!(f, "{message}{MESSAGE_SEPARATOR}{cause}"),
            (Some(message), None) => f.write_str(message),
            (None, Some(cause)) => write!(f, "{cause}"),
            (None, None) => f.write_str("unknown failure"),
        }
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Causes are compared by their rendered text
impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.cause.as_ref().map(ToString::to_string)
                == other.cause.as_ref().map(ToString::to_string)
    }
}

/// A value as a successful outcome
pub fn ok<A>(value: A) -> Outcome<A> {
    Ok(value)
}

/// A validation failure as an outcome
pub fn fail<A, M: Into<String>>(message: M) -> Outcome<A> {
    Err(Failure::message(message))
}

/// An error with context as an outcome
pub fn error<A, M, E>(message: M, cause: E) -> Outcome<A>
where
    M: Into<String>,
    E: std::error::Error + Send + Sync + 'static,
{
    Err(Failure::error(message, cause))
}

/// Message editing on outcomes; successes pass through untouched
pub trait OutcomeExt: Sized {
    #[must_use]
    fn set_message<M: Into<String>>(self, message: M) -> Self;
    #[must_use]
    fn add_message<M: Into<String>>(self, message: M) -> Self;
}

impl<A> OutcomeExt for Outcome<A> {
    fn set_message<M: Into<String>>(self, message: M) -> Self {
        self.map_err(|failure| failure.set_message(message))
    }

    fn add_message<M: Into<String>>(self, message: M) -> Self {
        self.map_err(|failure| failure.add_message(message))
    }
}

/// A caught panic, kept as the cause of a failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panicked: {message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    pub(crate) fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }

    #[must_use]
    pub fn panic_message(&self) -> &str {
        &self.message
    }
}
