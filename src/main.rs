use clap::Parser;
use hosts_updater::core::ConfigProvider;
use hosts_updater::utils::{logger, validation::Validate};
use hosts_updater::{CliConfig, HostsPipeline, LocalStorage, TomlConfig, UpdateEngine};

async fn update<C: ConfigProvider + Validate>(
    config: C,
    base_dir: String,
) -> hosts_updater::Result<String> {
    config.validate()?;

    let storage = LocalStorage::new(base_dir);
    let pipeline = HostsPipeline::new(storage, config);
    UpdateEngine::new(pipeline).run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting hosts-updater");
    tracing::debug!("CLI config: {:?}", config);

    let base_dir = config.base_dir.clone();
    let result = match config.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(toml_config) => update(toml_config, base_dir).await,
                Err(e) => Err(e.context(format!("error loading config {}", path))),
            }
        }
        None => update(config, base_dir).await,
    };

    match result {
        Ok(output_path) => {
            println!("Hosts file written to {}", output_path);
        }
        Err(e) => {
            tracing::error!("Update failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
