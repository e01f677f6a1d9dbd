use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Banks
// ==============================================================================

/// A row of the `banks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Bank {
    pub id: i64,
    pub name: String,
}

/// Payload for `POST /banks/`. The id is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBank {
    pub id: i64,
    pub name: String,
}

impl NewBank {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)
    }
}

/// Payload for `PUT /banks/{id}`.
///
/// Clients usually send the same body as for creation; a body `id` is ignored
/// because the path is the only source of identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankUpdate {
    pub name: String,
}

impl BankUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)
    }
}

// ==============================================================================
// Branches
// ==============================================================================

/// A branch as read through the `bank_branches` view, i.e. with the owning
/// bank's name resolved at query time. This shape is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub ifsc: String,
    pub bank_id: i64,
    pub bank_name: String,
    pub branch: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
}

/// Payload for `POST /branches/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBranch {
    pub ifsc: String,
    pub bank_id: i64,
    pub branch: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
}

impl NewBranch {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("ifsc", &self.ifsc)
    }

    /// Splits off the mutable part of the payload.
    pub fn changes(&self) -> BranchChanges {
        BranchChanges {
            bank_id: self.bank_id,
            branch: self.branch.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            state: self.state.clone(),
        }
    }
}

/// Payload for `PUT /branches/{ifsc}`: every field except the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchChanges {
    pub bank_id: i64,
    pub branch: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
}

/// The narrow projection returned by the city + bank filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CityBranch {
    pub bank_name: String,
    pub ifsc: String,
    pub branch: String,
    pub city: String,
}

/// Confirmation body returned by the delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub detail: String,
}

impl Deleted {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}
