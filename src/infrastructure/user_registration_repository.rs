use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use tracing::warn;

use crate::{
    domain::{
        error::RepositoryError,
        models::user::{NewUser, PersistedUser, UserId},
        repositories::user_registration_repository::UserRegistrationRepository,
    },
    infrastructure::entity::users,
};

#[derive(Clone)]
pub struct MySqlUserRegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl MySqlUserRegistrationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRegistrationRepository for MySqlUserRegistrationRepository {
    async fn register_user(&self, user: &NewUser) -> Result<PersistedUser, RepositoryError> {
        // Begin transaction
        let txn = self.db.begin().await.map_err(classify)?;

        let model = match insert_and_read_back(&txn, user).await {
            Ok(model) => model,
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!(error = %rollback, "rollback of user insert failed");
                }
                return Err(e);
            }
        };

        // Commit transaction
        txn.commit().await.map_err(classify)?;

        Ok(PersistedUser::reconstruct(
            UserId::new(model.id),
            model.customer_id,
            model.role_id,
            model.name,
            model.email,
            model.created_at,
        ))
    }

    // closes the pool for every handle sharing it, the reference lookups included
    async fn close(self) -> Result<(), RepositoryError> {
        self.db
            .close_by_ref()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
    }
}

/// MySQL cannot return the generated id from the insert, so it is read back
/// through the unique email inside the same transaction.
async fn insert_and_read_back(
    txn: &DatabaseTransaction,
    user: &NewUser,
) -> Result<users::Model, RepositoryError> {
    let user_model = users::ActiveModel {
        customer_id: Set(user.customer_id.clone()),
        role_id: Set(user.role_id.clone()),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        ..Default::default()
    };

    users::Entity::insert(user_model)
        .exec_without_returning(txn)
        .await
        .map_err(classify)?;

    users::Entity::find()
        .filter(users::Column::Email.eq(user.email.as_str()))
        .order_by_desc(users::Column::CreatedAt)
        .one(txn)
        .await
        .map_err(classify)?
        .ok_or_else(|| {
            RepositoryError::DatabaseError(format!(
                "inserted user {} could not be read back",
                user.email
            ))
        })
}

fn classify(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            RepositoryError::DuplicateEntry(message)
        }
        _ => RepositoryError::DatabaseError(err.to_string()),
    }
}
