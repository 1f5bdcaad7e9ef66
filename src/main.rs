use clap::Parser;
use regime_signals::cli::{print_outcome, Cli, Commands};
use regime_signals::config::Config;
use regime_signals::engine::RegimeEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        let mut config = Config::default();
        config.apply_env();
        config
    });

    // Initialize telemetry
    let _telemetry = regime_signals::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Signals => print_outcome(engine(&config)?.signals().await)?,
        Commands::Regime => print_outcome(engine(&config)?.regime().await)?,
        Commands::Drift => print_outcome(engine(&config)?.drift().await)?,
        Commands::Thesis => print_outcome(engine(&config)?.thesis().await)?,
        Commands::QualityReport => print_outcome(engine(&config)?.quality_report().await)?,
        Commands::Replay(args) => {
            tracing::info!("Starting replay");
            args.execute(&config).await?;
        }
        Commands::Config => {
            let key_state = |key: &Option<String>| if key.is_some() { "set" } else { "missing" };
            println!("Current configuration:");
            println!(
                "  FRED: {} (api key {})",
                config.source.fred_base_url,
                key_state(&config.source.fred_api_key)
            );
            println!(
                "  Alpha Vantage: {} (api key {})",
                config.source.alpha_vantage_base_url,
                key_state(&config.source.alpha_vantage_api_key)
            );
            println!("  CoinGecko: {}", config.source.coingecko_base_url);
            println!(
                "  Cache TTL: {}s, retries: {} x {}ms",
                config.source.cache_ttl_secs,
                config.source.retry_attempts,
                config.source.retry_base_delay_ms
            );
            println!(
                "  Staleness: SLA x{}, freshness window {}d",
                config.staleness.sla_slack_factor, config.staleness.freshness_window_days
            );
            println!(
                "  Thesis: alternative {}, history {}",
                config.thesis.alternative_probability, config.thesis.history_limit
            );
            println!(
                "  Replay: {}d over {} series -> {}",
                config.replay.window_days,
                config.replay.series.len(),
                config.replay.output_dir.display()
            );
        }
    }

    Ok(())
}

fn engine(config: &Config) -> anyhow::Result<RegimeEngine> {
    Ok(RegimeEngine::from_config(config)?)
}
