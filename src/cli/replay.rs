//! Replay command implementation

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::replay::{ReplayMeta, ReplaySnapshotBuilder, ReplayWriter};
use crate::source::FredClient;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Window length in days (defaults to config)
    #[arg(long)]
    pub days: Option<u32>,

    /// Comma-separated FRED series ids (defaults to config)
    #[arg(long, value_delimiter = ',')]
    pub series: Vec<String>,

    /// Output directory for the snapshot artifact (defaults to config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Build twice and fail unless both builds match
    #[arg(long)]
    pub validate: bool,
}

impl ReplayArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let days = self.days.unwrap_or(config.replay.window_days);
        let series = if self.series.is_empty() {
            config.replay.series.clone()
        } else {
            self.series.clone()
        };
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| config.replay.output_dir.clone());

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let fred = FredClient::with_config(config.source.fred())?;
        let builder = ReplaySnapshotBuilder::new(Arc::new(fred), clock.clone())
            .with_retry(config.source.retry_policy());

        if self.validate {
            let report = builder.validate_determinism(days, &series).await?;
            let out = serde_json::json!({
                "deterministic": true,
                "rows": report.rows,
                "digest": report.digest,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        let build = builder.build(days, &series).await;
        let meta = ReplayMeta::new(clock.now(), days, &series, &build);
        let path = ReplayWriter::new(output_dir).write(&meta, &build)?;

        let out = serde_json::json!({
            "path": path,
            "summary": meta.summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(())
    }
}
