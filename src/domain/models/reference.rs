use serde::{Deserialize, Serialize};

/// Entity a reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    Customer,
    Role,
}

impl ReferenceKind {
    /// Input name of the direct identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            ReferenceKind::Customer => "CUSTOMER_ID",
            ReferenceKind::Role => "ROLE_ID",
        }
    }

    /// Input name of the lookup name
    pub fn name_field(&self) -> &'static str {
        match self {
            ReferenceKind::Customer => "CUSTOMER_NAME",
            ReferenceKind::Role => "ROLE_NAME",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Customer => f.write_str("Customer"),
            ReferenceKind::Role => f.write_str("Role"),
        }
    }
}

/// Pointer to an existing entity, given as an identifier, a name, or both.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityReference {
    id: Option<String>,
    name: Option<String>,
}

impl EntityReference {
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: id.filter(|v| !v.is_empty()),
            name: name.filter(|v| !v.is_empty()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
