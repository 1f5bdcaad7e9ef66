//! NDJSON replay artifacts

use super::builder::{determinism_payload, payload_digest, ReplayBuild};
use super::ReplayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Summary carried on the meta line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub rows: usize,
    pub series: Vec<String>,
    pub errors: Vec<String>,
    pub digest: String,
}

/// First line of every artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayMeta {
    #[serde(rename = "type")]
    pub record_type: String,
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub summary: ReplaySummary,
}

impl ReplayMeta {
    pub fn new(
        generated_at: DateTime<Utc>,
        window_days: u32,
        series: &[String],
        build: &ReplayBuild,
    ) -> Self {
        Self {
            record_type: "meta".to_string(),
            generated_at,
            window_days,
            summary: ReplaySummary {
                rows: build.rows.len(),
                series: series.to_vec(),
                errors: build.errors.clone(),
                digest: payload_digest(&determinism_payload(&build.rows)),
            },
        }
    }
}

/// Writes replay builds under a fixed output directory
#[derive(Debug, Clone)]
pub struct ReplayWriter {
    output_dir: PathBuf,
}

impl ReplayWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Artifact path for a generation timestamp
    pub fn path_for(&self, generated_at: DateTime<Utc>) -> PathBuf {
        self.output_dir.join(format!(
            "replay_snapshot_{}.ndjson",
            generated_at.format("%Y%m%dT%H%M%SZ")
        ))
    }

    /// Write meta then one line per row. Fails if the file already exists.
    pub fn write(&self, meta: &ReplayMeta, build: &ReplayBuild) -> Result<PathBuf, ReplayError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(meta.generated_at);

        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        let mut out = BufWriter::new(file);

        serde_json::to_writer(&mut out, meta)?;
        out.write_all(b"\n")?;
        for row in &build.rows {
            serde_json::to_writer(&mut out, row)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        tracing::info!(path = %path.display(), rows = build.rows.len(), "Wrote replay artifact");
        Ok(path)
    }
}
