use clap::Parser;
use neighborhood_etl::adapters::mapbox::redact_token;
use neighborhood_etl::adapters::xlsx_writer::output_file_name;
use neighborhood_etl::core::{ConfigProvider, Pipeline};
use neighborhood_etl::utils::{logger, validation::Validate};
use neighborhood_etl::{EtlEngine, LocalStorage, MapboxGeocoder, NeighborhoodPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "neighborhood-etl driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "neighborhood-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Read the input and show what would be geocoded, without calling the service
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based neighborhood ETL");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let geocoder = MapboxGeocoder::new(config.geocoder_settings())?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no geocoding requests will be sent");
        perform_dry_run(&config, &geocoder).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = NeighborhoodPipeline::new(LocalStorage::default(), geocoder, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let settings = config.geocoder_settings();

    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    println!("  Input: {} [{}]", config.input_path(), config.sheet_name());
    println!("  Columns scanned: {}", config.max_columns());
    println!("  Output: {}", output_file_name(config.output_stem()));
    println!("  Geocoder: {} ({})", settings.endpoint, settings.dataset);
    println!("  Progress every: {} rows", config.progress_interval());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig, geocoder: &MapboxGeocoder) -> anyhow::Result<()> {
    let preview = NeighborhoodPipeline::new(
        LocalStorage::default(),
        DryRunResolver,
        config.clone(),
    );
    let records = preview.extract().await?;
    let data_rows = records.len().saturating_sub(1);

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📥 Input:");
    println!("  Rows read: {} (1 header + {} data rows)", records.len(), data_rows);
    println!("  Geocoding requests needed: {}", data_rows);

    if let Some(first) = records.get(1) {
        println!();
        println!("📡 First request:");
        match (first.latitude().as_f64(), first.longitude().as_f64()) {
            (Some(lat), Some(lon)) => {
                let url = geocoder.reverse_url(lon, lat)?;
                println!("  {}", redact_token(&url));
            }
            _ => println!("  ⚠️ Row 2 has non-numeric coordinates; the run would stop there"),
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");

    Ok(())
}

/// Never called; only `extract` runs during a dry run.
struct DryRunResolver;

#[async_trait::async_trait]
impl neighborhood_etl::core::NeighborhoodResolver for DryRunResolver {
    async fn resolve(&self, _longitude: f64, _latitude: f64) -> neighborhood_etl::Result<String> {
        Err(neighborhood_etl::EtlError::ConfigError {
            message: "geocoding is disabled during a dry run".to_string(),
        })
    }
}
