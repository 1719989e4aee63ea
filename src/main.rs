use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

use adcraft::settings::{FileStorage, LocalStorage, SecretCipher};
use adcraft::{utils, Config};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    let mut config = Config::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }
    debug!("Configuration loaded: {:?}", config);

    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&config.storage.data_dir));
    let cipher = if config.storage.encrypt_keys {
        Some(SecretCipher::load_or_create(&config.storage.data_dir).await?)
    } else {
        None
    };

    let ctx = cli::Context {
        config,
        storage,
        cipher,
        password: cli.password,
    };

    match cli.command {
        Commands::Models => cli::list_models(&ctx).await,
        Commands::Styles => {
            cli::list_styles();
            Ok(())
        }
        Commands::Config(args) => cli::config(&ctx, args).await,
        Commands::Prompts(args) => cli::prompts(&ctx, args).await,
        Commands::Generate(args) => cli::generate(&ctx, args).await,
        Commands::Health(args) => cli::health(&ctx, args).await,
        Commands::Usage(args) => cli::usage(&ctx, args).await,
    }
}
