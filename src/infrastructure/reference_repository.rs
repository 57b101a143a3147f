use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};

use crate::{
    domain::{
        error::RepositoryError, models::reference::ReferenceKind,
        repositories::reference_repository::ReferenceRepository,
    },
    infrastructure::entity::{corporate_customers, user_roles},
};

#[derive(Clone)]
pub struct MySqlReferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl MySqlReferenceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceRepository for MySqlReferenceRepository {
    async fn find_ids_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
        limit: u64,
    ) -> Result<Vec<String>, RepositoryError> {
        let ids = match kind {
            ReferenceKind::Customer => corporate_customers::Entity::find()
                .filter(corporate_customers::Column::Name.eq(name))
                .limit(limit)
                .all(self.db.as_ref())
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
                .into_iter()
                .map(|customer| customer.id)
                .collect(),
            ReferenceKind::Role => user_roles::Entity::find()
                .filter(user_roles::Column::RoleName.eq(name))
                .limit(limit)
                .all(self.db.as_ref())
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
                .into_iter()
                .map(|role| role.id)
                .collect(),
        };
        Ok(ids)
    }
}
