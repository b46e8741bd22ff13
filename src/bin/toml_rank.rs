use anyhow::Context;
use clap::Parser;
use unigoals_rank::config::toml_config::TomlConfig;
use unigoals_rank::core::{ConfigProvider, Pipeline};
use unigoals_rank::utils::{logger, validation::Validate};
use unigoals_rank::{aggregate_with, LocalStorage, RankingEngine, RankingPipeline};

#[derive(Parser)]
#[command(name = "toml-rank")]
#[command(about = "Unit ranking with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rank-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the top N setting from config
    #[arg(long)]
    top_n: Option<usize>,

    /// Dry run - show unit totals without writing any output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based ranking: {}", config.report.name);

    if let Some(top_n) = args.top_n {
        config.ranking.top_n = Some(top_n);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = RankingPipeline::new(source, sink, config);
    let engine = RankingEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Ranking completed successfully!");
            println!("✅ Ranking completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Ranking failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("   Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        tracing::info!("   Description: {}", description);
    }
    tracing::info!("   Units file: {}", config.units_file());
    if let Some(year) = config.year() {
        tracing::info!("   Year: {}", year);
    }
    tracing::info!("   NaN policy: {:?}", config.nan_policy());
    match config.top_n() {
        Some(n) => tracing::info!("   Leaderboard size: {}", n),
        None => tracing::info!("   Leaderboard size: all units"),
    }
    tracing::info!("   Output: {} {:?}", config.output_path(), config.output_formats());
    if let Some(archive) = config.archive_name() {
        tracing::info!("   Archive: {}", archive);
    }
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    // extract only; the sink is never written
    let pipeline = RankingPipeline::new(
        LocalStorage::new(".".to_string()),
        LocalStorage::new(config.output_path().to_string()),
        config.clone(),
    );
    let units = pipeline
        .extract()
        .await
        .with_context(|| format!("loading units from {}", config.units_file()))?;

    println!("🔍 {} units would be ranked:", units.len());
    for (key, unit) in units.iter() {
        println!(
            "   [{}] {} - {} items, total {}",
            key,
            unit.title,
            unit.content.len(),
            aggregate_with(unit, config.nan_policy())
        );
    }

    Ok(())
}
