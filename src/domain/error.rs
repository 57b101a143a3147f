use thiserror::Error;

use crate::domain::models::{reference::ReferenceKind, user::UserId};

/// Workflow stage a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Connect,
    Resolve,
    Write,
    Publish,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Required configuration {0} is not set")]
    ConfigurationMissing(String),

    #[error("Invalid configuration {0}")]
    ConfigurationInvalid(String),

    #[error("Failed to connect to database: {0}")]
    StoreUnavailable(String),

    #[error("Either {id} or {name} must be provided", id = .0.id_field(), name = .0.name_field())]
    MissingReference(ReferenceKind),

    #[error("{kind} '{name}' not found ({matches} matching rows)")]
    ReferenceNotFound {
        kind: ReferenceKind,
        name: String,
        matches: Matches,
    },

    #[error("Reference lookup failed: {0}")]
    LookupFailed(String),

    #[error("User with email {0} already exists")]
    DuplicateUser(String),

    #[error("Failed to insert user: {0}")]
    WriteFailed(String),

    #[error("User {user_id} was registered but the event was not published: {source}")]
    PublishFailed {
        user_id: UserId,
        #[source]
        source: PublishError,
    },
}

impl RegistrationError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::ConfigurationMissing(_) | Self::ConfigurationInvalid(_) => Stage::Configuration,
            Self::StoreUnavailable(_) => Stage::Connect,
            Self::MissingReference(_) | Self::ReferenceNotFound { .. } | Self::LookupFailed(_) => {
                Stage::Resolve
            }
            Self::DuplicateUser(_) | Self::WriteFailed(_) => Stage::Write,
            Self::PublishFailed { .. } => Stage::Publish,
        }
    }

    /// True when the user row is committed even though the run failed.
    pub fn user_persisted(&self) -> bool {
        matches!(self, Self::PublishFailed { .. })
    }
}

/// Number of rows a name lookup produced when it did not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matches {
    None,
    Many,
}

impl std::fmt::Display for Matches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matches::None => f.write_str("no"),
            Matches::Many => f.write_str("more than one"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Connection to broker failed: {0}")]
    Connection(String),

    #[error("Stream {0} not found")]
    StreamNotFound(String),

    #[error("Failed to serialize event: {0}")]
    Serialization(String),

    #[error("Broker rejected publish: {0}")]
    Rejected(String),
}
