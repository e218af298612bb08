//! Reagent model
//!
//! Reagents live in a small inventory registry that entries link against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ReagentId;

/// A reagent in the lab inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reagent {
    /// Unique identifier
    pub id: ReagentId,

    /// Reagent name
    pub name: String,

    /// Supplier catalog number
    #[serde(default)]
    pub catalog_number: String,

    /// Supplier name
    #[serde(default)]
    pub supplier: String,

    /// When the reagent was registered
    pub created_at: DateTime<Utc>,

    /// When the reagent was last modified
    pub updated_at: DateTime<Utc>,
}

impl Reagent {
    /// Create a new reagent
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ReagentId::new(),
            name: name.into(),
            catalog_number: String::new(),
            supplier: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reagent() {
        let reagent = Reagent::new("Taq polymerase");
        assert_eq!(reagent.name, "Taq polymerase");
        assert!(reagent.catalog_number.is_empty());
    }
}
