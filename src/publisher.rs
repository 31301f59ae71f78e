use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::sensor::{self, SensorReading};
use crate::stats::Stats;
use crate::types::RefreshResult;

/// Host stand-in: logs readings, appends snapshots, keeps last-known-good data.
pub struct SnapshotPublisher {
    targets: Vec<String>,
    jsonl_path: Option<String>,
    last: Option<RefreshResult>,
    stats: Arc<Stats>,
}

impl SnapshotPublisher {
    pub fn new(targets: Vec<String>, jsonl_path: Option<String>, stats: Arc<Stats>) -> Self {
        let jsonl_path = jsonl_path.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        Self {
            targets,
            jsonl_path,
            last: None,
            stats,
        }
    }

    pub async fn publish(&mut self, result: RefreshResult) -> Vec<SensorReading> {
        let readings = sensor::readings(&result, &self.targets);
        let with_value = readings.iter().filter(|r| r.value.is_some()).count();

        for r in &readings {
            match r.value {
                Some(v) => tracing::info!(
                    entity_id = %r.entity_id,
                    value = %v,
                    available = ?r.attributes.available.map(|d| d.to_string()),
                    min_limit = ?r.attributes.min_limit.map(|d| d.to_string()),
                    max_limit = ?r.attributes.max_limit.map(|d| d.to_string()),
                    "reading"
                ),
                None => tracing::info!(entity_id = %r.entity_id, "reading: no offer"),
            }
        }
        self.stats.add_offers(with_value as u64);

        if let Some(path) = &self.jsonl_path {
            if let Err(e) = append_jsonl(path, &result).await {
                tracing::warn!(path = %path, error = %e, "snapshot write failed");
            }
        }

        self.last = Some(result);
        readings
    }

    /// Last successfully published result; stays in place when a cycle fails.
    pub fn last(&self) -> Option<&RefreshResult> {
        self.last.as_ref()
    }
}

async fn append_jsonl(path: &str, result: &RefreshResult) -> Result<()> {
    let line = serde_json::to_string(result).context("serialize refresh result")?;
    let mut f = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("open {}", path))?;
    f.write_all(line.as_bytes()).await?;
    f.write_all(b"\n").await?;
    Ok(())
}
