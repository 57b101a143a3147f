use async_trait::async_trait;

use crate::domain::{error::RepositoryError, models::reference::ReferenceKind};

/// Read-only lookups of referenced entities by their distinguishing name
#[async_trait]
pub trait ReferenceRepository {
    /// Return the identifiers whose name column equals `name`, at most `limit` of them.
    async fn find_ids_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
        limit: u64,
    ) -> Result<Vec<String>, RepositoryError>;
}
