// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for metadata store operations

pub type Result<T> = std::result::Result<T, MetastoreError>;

#[derive(Debug, thiserror::Error)]
pub enum MetastoreError {
    #[error("Object already exists: {object}")]
    AlreadyExists { object: String },

    #[error("No such object: {object}")]
    NoSuchObject { object: String },

    #[error("Invalid object: {0}")]
    InvalidObject(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Metastore state poisoned: {0}")]
    Poisoned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetastoreError {
    pub fn already_exists<S: AsRef<str>>(object: S) -> Self {
        MetastoreError::AlreadyExists {
            object: object.as_ref().to_string(),
        }
    }

    pub fn no_such_object<S: AsRef<str>>(object: S) -> Self {
        MetastoreError::NoSuchObject {
            object: object.as_ref().to_string(),
        }
    }

    pub fn invalid_location<L: AsRef<str>, R: AsRef<str>>(location: L, reason: R) -> Self {
        MetastoreError::InvalidLocation {
            location: location.as_ref().to_string(),
            reason: reason.as_ref().to_string(),
        }
    }

    /// The store refused to create an object because it is already there.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, MetastoreError::AlreadyExists { .. })
    }

    /// A lookup found nothing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetastoreError::NoSuchObject { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for MetastoreError {
    fn from(err: std::sync::PoisonError<T>) -> MetastoreError {
        MetastoreError::Poisoned(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(MetastoreError::already_exists("test").is_already_exists());
        assert!(!MetastoreError::already_exists("test").is_not_found());
        assert!(MetastoreError::no_such_object("test.test").is_not_found());
        assert!(!MetastoreError::Connection("refused".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            MetastoreError::no_such_object("db.tbl").to_string(),
            "No such object: db.tbl"
        );
        assert_eq!(
            MetastoreError::invalid_location("", "empty path").to_string(),
            "Invalid location '': empty path"
        );
    }
}
