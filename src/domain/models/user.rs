use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{error::RegistrationError, models::reference::EntityReference};

/// Identifier assigned by the store at insert time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration input as supplied by the caller, before resolution
#[derive(Debug, Clone)]
pub struct UserRegistrationRequest {
    name: String,
    email: String,
    customer: EntityReference,
    role: EntityReference,
}

impl UserRegistrationRequest {
    pub fn new(
        name: String,
        email: String,
        customer: EntityReference,
        role: EntityReference,
    ) -> Result<Self, RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::ConfigurationMissing(
                "USER_NAME".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(RegistrationError::ConfigurationMissing(
                "USER_EMAIL".to_string(),
            ));
        }
        Ok(Self {
            name,
            email,
            customer,
            role,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn customer(&self) -> &EntityReference {
        &self.customer
    }
    pub fn role(&self) -> &EntityReference {
        &self.role
    }
}

/// Fully resolved user ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub customer_id: String,
    pub role_id: String,
}

/// User row as committed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUser {
    id: UserId,
    customer_id: String,
    role_id: String,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl PersistedUser {
    pub fn reconstruct(
        id: UserId,
        customer_id: String,
        role_id: String,
        name: String,
        email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            role_id,
            name,
            email,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }
    pub fn role_id(&self) -> &str {
        &self.role_id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
