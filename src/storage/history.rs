use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::calculator::CalculationResult;

pub const HISTORY_KEY: &str = "ecoFootprintResults";
pub const HISTORY_LIMIT: usize = 10;

/// A past result as persisted: the calculation plus id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// ISO-8601, UTC
    pub date: String,
    #[serde(flatten)]
    pub result: CalculationResult,
}

impl HistoryEntry {
    pub fn new(result: CalculationResult, at: DateTime<Utc>) -> Self {
        let date = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", date, &suffix[..8]),
            date,
            result,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date).ok().map(|d| d.with_timezone(&Utc))
    }
}

/// Direction of the newest total against the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Down,
    Up,
    Stable,
}

impl Trend {
    pub fn message(&self) -> &'static str {
        match self {
            Trend::Down => "Great job! Your emissions are decreasing.",
            Trend::Up => "Your emissions have increased. Let's try to lower them.",
            Trend::Stable => "Your emissions have remained stable.",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Down => write!(f, "down"),
            Trend::Up => write!(f, "up"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Most-recent-first list of past results, capped at `HISTORY_LIMIT`.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Unreadable or corrupt history reads as empty.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        match self.try_load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load result history, treating as empty: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_load(&self) -> Result<Vec<HistoryEntry>> {
        let Some(json) = self.store.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&json).context("Failed to parse result history")
    }

    pub async fn record(&self, result: CalculationResult) -> Result<HistoryEntry> {
        self.record_at(result, Utc::now()).await
    }

    /// Prepend, truncate to the newest `HISTORY_LIMIT`, write back
    pub async fn record_at(&self, result: CalculationResult, at: DateTime<Utc>) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(result, at);
        let mut entries = self.load().await;
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_LIMIT);

        let json = serde_json::to_string(&entries).context("Failed to serialize result history")?;
        self.store.set(HISTORY_KEY, json).await?;
        debug!("Recorded result {} ({} in history)", entry.id, entries.len());
        Ok(entry)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(HISTORY_KEY).await
    }

    pub async fn trend(&self) -> Option<Trend> {
        trend_of(&self.load().await)
    }
}

/// `None` with fewer than two entries
pub fn trend_of(entries: &[HistoryEntry]) -> Option<Trend> {
    let [latest, previous, ..] = entries else {
        return None;
    };
    let (latest, previous) = (latest.result.total_emissions, previous.result.total_emissions);
    Some(if latest < previous {
        Trend::Down
    } else if latest > previous {
        Trend::Up
    } else {
        Trend::Stable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CategoryEmissions;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn result(total: f64) -> CalculationResult {
        CalculationResult {
            total_emissions: total,
            category_emissions: CategoryEmissions { transport: total, ..Default::default() },
            tips: vec!["tip".into()],
        }
    }

    #[tokio::test]
    async fn test_history_capped_most_recent_first() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        let start = Utc::now();
        for i in 0..11 {
            history.record_at(result(i as f64), start + Duration::seconds(i)).await.unwrap();
        }

        let entries = history.load().await;
        assert_eq!(entries.len(), HISTORY_LIMIT);
        let totals: Vec<f64> = entries.iter().map(|e| e.result.total_emissions).collect();
        assert_eq!(totals, vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(entries[0].timestamp().unwrap() > entries[1].timestamp().unwrap());
    }

    #[tokio::test]
    async fn test_persisted_shape() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());
        history.record(result(3.5)).await.unwrap();

        let raw = store.get(HISTORY_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &json[0];
        assert!(first["id"].is_string());
        assert!(first["date"].as_str().unwrap().ends_with('Z'));
        assert_eq!(first["totalEmissions"], 3.5);
        assert_eq!(first["categoryEmissions"]["transport"], 3.5);
        assert_eq!(first["tips"][0], "tip");
    }

    #[tokio::test]
    async fn test_ids_unique_within_same_instant() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        let now = Utc::now();
        let a = history.record_at(result(1.0), now).await.unwrap();
        let b = history.record_at(result(1.0), now).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_corrupt_history_reads_empty_and_recovers() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "[{broken".into()).await.unwrap();
        let history = HistoryStore::new(store);

        assert!(history.load().await.is_empty());
        history.record(result(1.0)).await.unwrap();
        assert_eq!(history.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        history.record(result(1.0)).await.unwrap();
        history.clear().await.unwrap();
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_trend() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        let t0 = Utc::now();
        assert_eq!(history.trend().await, None);
        history.record_at(result(20.0), t0).await.unwrap();
        assert_eq!(history.trend().await, None);
        history.record_at(result(15.0), t0 + Duration::seconds(1)).await.unwrap();
        assert_eq!(history.trend().await, Some(Trend::Down));
        history.record_at(result(18.0), t0 + Duration::seconds(2)).await.unwrap();
        assert_eq!(history.trend().await, Some(Trend::Up));
        history.record_at(result(18.0), t0 + Duration::seconds(3)).await.unwrap();
        assert_eq!(history.trend().await, Some(Trend::Stable));
    }
}
