use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::user::{UserId, UserRegistrationRequest};

pub const USER_REGISTERED: &str = "user_registered";

/// Event announcing a committed registration.
///
/// Field names are part of the wire format consumed by other services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub event_type: String,
    pub user_id: UserId,
    pub timestamp: String,
    pub data: BTreeMap<String, String>,
}

impl RegistrationEvent {
    /// Build the event for a user that has just been written.
    ///
    /// `data` carries the attributes the caller supplied, as given, keyed by
    /// their lower-cased input names. Resolved identifiers are not added.
    pub fn user_registered(
        user_id: UserId,
        request: &UserRegistrationRequest,
        emitted_at: DateTime<Utc>,
    ) -> Self {
        let mut data = BTreeMap::new();
        data.insert("user_name".to_string(), request.name().to_string());
        data.insert("user_email".to_string(), request.email().to_string());

        for (key, value) in [
            ("customer_id", request.customer().id()),
            ("customer_name", request.customer().name()),
            ("role_id", request.role().id()),
            ("role_name", request.role().name()),
        ] {
            if let Some(value) = value {
                data.insert(key.to_string(), value.to_string());
            }
        }

        Self {
            event_type: USER_REGISTERED.to_string(),
            user_id,
            timestamp: emitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            data,
        }
    }

    /// Broker-side de-duplication key; one per registered user.
    pub fn message_id(&self) -> String {
        format!("{}:{}", self.event_type, self.user_id)
    }
}
