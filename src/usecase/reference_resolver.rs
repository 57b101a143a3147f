use tracing::debug;

use crate::domain::{
    error::{Matches, RegistrationError},
    models::reference::{EntityReference, ReferenceKind},
    repositories::reference_repository::ReferenceRepository,
};

/// Turns a reference into a concrete identifier.
///
/// A supplied identifier is returned unchanged without touching the store; it is
/// not checked for existence. A name resolves only when exactly one row matches.
pub struct ReferenceResolver<L: ReferenceRepository> {
    reference_repository: L,
}

impl<L: ReferenceRepository> ReferenceResolver<L> {
    pub fn new(reference_repository: L) -> Self {
        Self {
            reference_repository,
        }
    }

    pub async fn resolve(
        &self,
        kind: ReferenceKind,
        reference: &EntityReference,
    ) -> Result<String, RegistrationError>
    where
        L: Send + Sync,
    {
        if let Some(id) = reference.id() {
            return Ok(id.to_string());
        }
        let name = reference
            .name()
            .ok_or(RegistrationError::MissingReference(kind))?;

        // two rows are enough to tell "unique" from "ambiguous"
        let mut ids = self
            .reference_repository
            .find_ids_by_name(kind, name, 2)
            .await
            .map_err(|e| RegistrationError::LookupFailed(e.to_string()))?;

        match ids.len() {
            1 => {
                let id = ids.remove(0);
                debug!(%kind, name, id = %id, "resolved reference by name");
                Ok(id)
            }
            0 => Err(not_found(kind, name, Matches::None)),
            _ => Err(not_found(kind, name, Matches::Many)),
        }
    }
}

fn not_found(kind: ReferenceKind, name: &str, matches: Matches) -> RegistrationError {
    RegistrationError::ReferenceNotFound {
        kind,
        name: name.to_string(),
        matches,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use rstest::*;

    use super::*;
    use crate::domain::error::RepositoryError;

    // mock repository: customers and roles keyed by name
    #[derive(Clone, Default)]
    struct MockReferenceRepository {
        customers: Vec<(String, String)>,
        roles: Vec<(String, String)>,
        queries: Arc<AtomicUsize>,
        broken: bool,
    }

    #[async_trait]
    impl ReferenceRepository for MockReferenceRepository {
        async fn find_ids_by_name(
            &self,
            kind: ReferenceKind,
            name: &str,
            limit: u64,
        ) -> Result<Vec<String>, RepositoryError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(RepositoryError::DatabaseError("connection reset".to_string()));
            }
            let rows = match kind {
                ReferenceKind::Customer => &self.customers,
                ReferenceKind::Role => &self.roles,
            };
            Ok(rows
                .iter()
                .filter(|(_, n)| n == name)
                .map(|(id, _)| id.clone())
                .take(limit as usize)
                .collect())
        }
    }

    #[fixture]
    fn repository() -> MockReferenceRepository {
        MockReferenceRepository {
            customers: vec![
                ("C1".to_string(), "Acme".to_string()),
                ("C2".to_string(), "Globex".to_string()),
                ("C3".to_string(), "Globex".to_string()),
            ],
            roles: vec![("R1".to_string(), "admin".to_string())],
            ..Default::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_id_is_used_without_query(repository: MockReferenceRepository) {
        let queries = repository.queries.clone();
        let resolver = ReferenceResolver::new(repository);

        let reference = EntityReference::new(Some("unknown".to_string()), Some("Acme".to_string()));
        let id = resolver.resolve(ReferenceKind::Customer, &reference).await.unwrap();

        assert_eq!(id, "unknown");
        assert_eq!(queries.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case(ReferenceKind::Customer, "Acme", "C1")]
    #[case(ReferenceKind::Role, "admin", "R1")]
    #[tokio::test]
    async fn test_unique_name_resolves(
        repository: MockReferenceRepository,
        #[case] kind: ReferenceKind,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        let resolver = ReferenceResolver::new(repository);
        let id = resolver
            .resolve(kind, &EntityReference::by_name(name))
            .await
            .unwrap();
        assert_eq!(id, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_name_negative(repository: MockReferenceRepository) {
        let resolver = ReferenceResolver::new(repository);
        let err = resolver
            .resolve(ReferenceKind::Customer, &EntityReference::by_name("Initech"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ReferenceNotFound {
                kind: ReferenceKind::Customer,
                matches: Matches::None,
                ..
            }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_ambiguous_name_negative(repository: MockReferenceRepository) {
        let resolver = ReferenceResolver::new(repository);
        let err = resolver
            .resolve(ReferenceKind::Customer, &EntityReference::by_name("Globex"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ReferenceNotFound {
                matches: Matches::Many,
                ..
            }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_reference_negative(repository: MockReferenceRepository) {
        let queries = repository.queries.clone();
        let resolver = ReferenceResolver::new(repository);
        let err = resolver
            .resolve(ReferenceKind::Role, &EntityReference::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::MissingReference(ReferenceKind::Role)
        ));
        assert_eq!(err.to_string(), "Either ROLE_ID or ROLE_NAME must be provided");
        assert_eq!(queries.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_store_error_is_lookup_failure(mut repository: MockReferenceRepository) {
        repository.broken = true;
        let resolver = ReferenceResolver::new(repository);
        let err = resolver
            .resolve(ReferenceKind::Role, &EntityReference::by_name("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::LookupFailed(_)));
    }
}
