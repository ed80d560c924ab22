//! # Write Outcomes
//!
//! Acknowledgements returned by store writes. Serialized in the same shape
//! the document store reports them (`insertedId`, `deletedCount`, ...).

use serde::{Deserialize, Serialize};

/// Result of inserting one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Option<String>,
}

impl InsertOutcome {
    pub fn inserted(id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id.into()),
        }
    }
}

/// Result of updating documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
        }
    }
}

/// Result of deleting documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_names() {
        let json = serde_json::to_value(InsertOutcome::inserted("abc")).unwrap();
        assert_eq!(json["insertedId"], "abc");
        assert_eq!(json["acknowledged"], true);

        let json = serde_json::to_value(DeleteOutcome::new(0)).unwrap();
        assert_eq!(json["deletedCount"], 0);

        let json = serde_json::to_value(UpdateOutcome::new(1, 1)).unwrap();
        assert_eq!(json["modifiedCount"], 1);
        assert!(json["upsertedId"].is_null());
    }
}
