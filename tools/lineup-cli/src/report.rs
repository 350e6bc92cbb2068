//! JSON report files

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Report body with run metadata
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<T> {
    pub generated_at: DateTime<Utc>,
    pub engine_version: &'static str,
    pub season: Option<String>,
    pub gameweek: Option<u32>,
    pub report: T,
}

impl<T: Serialize> ReportEnvelope<T> {
    pub fn new(report: T, season: Option<String>, gameweek: Option<u32>) -> Self {
        Self {
            generated_at: Utc::now(),
            engine_version: lineup_engine::VERSION,
            season,
            gameweek,
            report,
        }
    }

    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report: {:?}", path))?;
        info!("Report written to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_envelope_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let envelope = ReportEnvelope::new(vec![1, 2, 3], Some("2025-26".to_string()), Some(7));
        envelope.write_to(&path).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["season"], "2025-26");
        assert_eq!(written["gameweek"], 7);
        assert_eq!(written["report"], serde_json::json!([1, 2, 3]));
        assert!(written["generated_at"].is_string());
    }
}
