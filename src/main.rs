use clap::Parser;
use neighborhood_etl::core::ConfigProvider;
use neighborhood_etl::utils::{logger, validation::Validate};
use neighborhood_etl::{
    CliConfig, EtlEngine, EtlError, LocalStorage, MapboxGeocoder, NeighborhoodPipeline,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting neighborhood-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run(config, monitor_enabled).await {
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
}

async fn run(config: CliConfig, monitor_enabled: bool) -> Result<String, EtlError> {
    // 整個批次共用一個 geocoder
    let geocoder = MapboxGeocoder::new(config.geocoder_settings())?;
    let pipeline = NeighborhoodPipeline::new(LocalStorage::default(), geocoder, config);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}
