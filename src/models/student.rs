//! Roster entries.

use serde::{Deserialize, Serialize};

/// Student identifier (Unix milliseconds at creation, bumped for uniqueness).
pub type StudentId = i64;

/// A student on the roster. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}
