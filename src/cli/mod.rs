//! CLI interface for regime-signals
//!
//! Provides subcommands for:
//! - `signals`: Feature snapshots with per-sleeve quality
//! - `regime`: Current regime score, label and confidence
//! - `drift`: Data-quality drift behind the regime call
//! - `thesis`: Base and alternative theses
//! - `quality-report`: Per-symbol staleness report
//! - `replay`: Deterministic replay snapshot
//! - `config`: Show configuration

mod output;
mod replay;

pub use output::print_outcome;
pub use replay::ReplayArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "regime-signals")]
#[command(about = "Market regime signals from unreliable macro and market data feeds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feature snapshots with per-sleeve quality
    Signals,
    /// Current regime
    Regime,
    /// Drift state and confidence cap
    Drift,
    /// Base thesis and alternatives
    Thesis,
    /// Per-symbol staleness report
    QualityReport,
    /// Build a replay snapshot over a historical window
    Replay(ReplayArgs),
    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay_args() {
        let cli = Cli::parse_from([
            "regime-signals",
            "--config",
            "custom.toml",
            "replay",
            "--days",
            "7",
            "--series",
            "DGS10,DGS2",
            "--validate",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.days, Some(7));
                assert_eq!(args.series, vec!["DGS10", "DGS2"]);
                assert!(args.validate);
                assert!(args.output_dir.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_quality_report() {
        let cli = Cli::parse_from(["regime-signals", "quality-report"]);
        assert_eq!(cli.config, "config.toml");
        assert!(matches!(cli.command, Commands::QualityReport));
    }
}
