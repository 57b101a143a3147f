use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::user::{NewUser, PersistedUser},
};

/// Repository for user registration; the only writer of the users table
#[async_trait]
pub trait UserRegistrationRepository {
    /// Insert the user and read back its store-assigned identifier in a single transaction.
    ///
    /// A uniqueness violation on email is reported as [`RepositoryError::DuplicateEntry`].
    async fn register_user(&self, user: &NewUser) -> Result<PersistedUser, RepositoryError>;

    /// Release the store connection. Nothing is read or written afterwards.
    async fn close(self) -> Result<(), RepositoryError>
    where
        Self: Sized;
}
