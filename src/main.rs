use clap::Parser;
use textbook_store::config::toml_config::StoreTomlConfig;
use textbook_store::core::snapshot::{self, LoadOutcome};
use textbook_store::core::ConfigProvider;
use textbook_store::utils::{logger, validation::Validate};
use textbook_store::{CliConfig, Inventory, LocalStorage, StoreEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting textbook-store CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let mut config = match StoreTomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load config file '{}': {}", path, e);
                    eprintln!("Failed to load config file '{}': {}", path, e);
                    std::process::exit(1);
                }
            };

            // 應用命令列覆蓋設定
            if let Some(ref data_file) = cli.data_file {
                config.persistence.data_file = data_file.clone();
                tracing::info!("Data file overridden to: {}", data_file);
            }

            run_store(config).await
        }
        None => run_store(cli).await,
    }
}

async fn run_store<C: ConfigProvider + Validate>(config: C) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.base_path().to_string());

    // 讀取既有的庫存快照；缺檔與壞檔都以空庫存繼續
    let inventory = match snapshot::load_snapshot(&storage, config.data_file()).await {
        Ok(LoadOutcome::Loaded(inventory)) => {
            tracing::info!(
                "Loaded {} textbook(s) from {}",
                inventory.len(),
                config.data_file()
            );
            inventory
        }
        Ok(LoadOutcome::Missing) => {
            println!("No existing inventory file found. Starting with an empty inventory.");
            Inventory::new()
        }
        Err(e) => {
            tracing::error!("Failed to load the inventory snapshot: {}", e);
            println!("Could not read the existing inventory file. Starting with an empty inventory.");
            Inventory::new()
        }
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let mut engine = StoreEngine::new(storage, config, inventory);
    engine.run(&mut input, &mut output).await?;

    Ok(())
}
