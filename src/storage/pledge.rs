use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::KeyValueStore;
use crate::error::FootprintError;
use crate::validation::validate_pledge;

pub const PLEDGE_KEY: &str = "ecoPledge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pledge {
    pub name: String,
    pub tree_count: u32,
}

impl Pledge {
    pub fn summary(&self) -> String {
        let noun = if self.tree_count > 1 { "trees" } else { "tree" };
        format!("Thank you, {}! You have pledged to plant {} {}.", self.name, self.tree_count, noun)
    }
}

/// At most one pledge; a new one replaces the old.
pub struct PledgeStore {
    store: Arc<dyn KeyValueStore>,
}

impl PledgeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Absent or unreadable pledge reads as none
    pub async fn current(&self) -> Option<Pledge> {
        let raw = match self.store.get(PLEDGE_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read pledge: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(pledge) => Some(pledge),
            Err(e) => {
                warn!("Failed to parse pledge, ignoring it: {}", e);
                None
            }
        }
    }

    pub async fn pledge(&self, name: &str, tree_count: u32) -> Result<Pledge, FootprintError> {
        validate_pledge(name, tree_count)?;
        let pledge = Pledge { name: name.trim().to_string(), tree_count };
        let json = serde_json::to_string(&pledge)
            .map_err(|e| FootprintError::Storage(format!("failed to serialize pledge: {}", e)))?;
        self.store
            .set(PLEDGE_KEY, json)
            .await
            .map_err(|e| FootprintError::Storage(format!("{:#}", e)))?;
        info!("Recorded pledge of {} tree(s)", tree_count);
        Ok(pledge)
    }

    pub async fn reset(&self) -> Result<()> {
        self.store.remove(PLEDGE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_pledge_replaces_previous() {
        let store = Arc::new(MemoryStore::new());
        let pledges = PledgeStore::new(store.clone());
        assert!(pledges.current().await.is_none());

        pledges.pledge("Asha", 1).await.unwrap();
        pledges.pledge(" Ravi ", 3).await.unwrap();

        let current = pledges.current().await.unwrap();
        assert_eq!(current, Pledge { name: "Ravi".into(), tree_count: 3 });

        let raw = store.get(PLEDGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"name":"Ravi","treeCount":3}"#);
    }

    #[tokio::test]
    async fn test_invalid_pledge_not_saved() {
        let pledges = PledgeStore::new(Arc::new(MemoryStore::new()));
        match pledges.pledge("  ", 0).await {
            Err(FootprintError::Validation(errors)) => assert_eq!(errors.fields().len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(pledges.current().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_pledge_and_reset() {
        let store = Arc::new(MemoryStore::new());
        store.set(PLEDGE_KEY, "nope".into()).await.unwrap();
        let pledges = PledgeStore::new(store);
        assert!(pledges.current().await.is_none());

        pledges.pledge("Asha", 2).await.unwrap();
        pledges.reset().await.unwrap();
        assert!(pledges.current().await.is_none());
    }

    #[test]
    fn test_summary_pluralises() {
        let one = Pledge { name: "A".into(), tree_count: 1 };
        let many = Pledge { name: "A".into(), tree_count: 4 };
        assert!(one.summary().ends_with("1 tree."));
        assert!(many.summary().ends_with("4 trees."));
    }
}
