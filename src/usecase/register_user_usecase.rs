use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    domain::{
        error::{RegistrationError, RepositoryError},
        models::{
            event::RegistrationEvent,
            reference::ReferenceKind,
            user::{NewUser, PersistedUser, UserRegistrationRequest},
        },
        repositories::{
            reference_repository::ReferenceRepository,
            user_registration_repository::UserRegistrationRepository,
        },
        services::event_publisher::EventPublisher,
    },
    usecase::reference_resolver::ReferenceResolver,
};

/// Resolve, write, then publish.
///
/// Failures before the write leave nothing behind, and a failed write is rolled
/// back by the repository. A failed publish happens after the commit and is
/// reported as [`RegistrationError::PublishFailed`] carrying the persisted id.
pub struct RegisterUserUsecase<
    L: ReferenceRepository,
    R: UserRegistrationRepository,
    P: EventPublisher,
> {
    reference_resolver: ReferenceResolver<L>,
    registration_repository: R,
    event_publisher: P,
}

impl<L: ReferenceRepository, R: UserRegistrationRepository, P: EventPublisher>
    RegisterUserUsecase<L, R, P>
{
    pub fn new(reference_repository: L, registration_repository: R, event_publisher: P) -> Self {
        Self {
            reference_resolver: ReferenceResolver::new(reference_repository),
            registration_repository,
            event_publisher,
        }
    }

    pub async fn execute(
        self,
        request: UserRegistrationRequest,
    ) -> Result<PersistedUser, RegistrationError>
    where
        L: Send + Sync,
        R: Send + Sync,
    {
        let Self {
            reference_resolver,
            registration_repository,
            event_publisher,
        } = self;

        info!("Resolving customer and role references");
        let customer_id = reference_resolver
            .resolve(ReferenceKind::Customer, request.customer())
            .await?;
        let role_id = reference_resolver
            .resolve(ReferenceKind::Role, request.role())
            .await?;

        let new_user = NewUser {
            name: request.name().to_string(),
            email: request.email().to_string(),
            customer_id,
            role_id,
        };

        info!(email = %new_user.email, "Registering user in database");
        let user = registration_repository
            .register_user(&new_user)
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateEntry(_) => {
                    RegistrationError::DuplicateUser(new_user.email.clone())
                }
                other => RegistrationError::WriteFailed(other.to_string()),
            })?;
        info!(
            user_id = %user.id(),
            customer_id = user.customer_id(),
            role_id = user.role_id(),
            created_at = %user.created_at(),
            "Inserted user {} <{}>",
            user.name(),
            user.email()
        );

        // the store connection is closed before the broker call starts
        drop(reference_resolver);
        if let Err(e) = registration_repository.close().await {
            warn!(error = %e, "closing the database connection failed");
        }

        let event = RegistrationEvent::user_registered(user.id().clone(), &request, Utc::now());
        info!(user_id = %user.id(), "Publishing registration event");
        if let Err(source) = event_publisher.publish(&event).await {
            error!(
                user_id = %user.id(),
                consistency_gap = true,
                error = %source,
                "User persisted but registration event was not published"
            );
            return Err(RegistrationError::PublishFailed {
                user_id: user.id().clone(),
                source,
            });
        }

        info!(user_id = %user.id(), "User registration completed");
        Ok(user)
    }
}
