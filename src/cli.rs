//! Command-line surface
//!
//! Thin presentation layer over the library: it owns argument parsing, the
//! password edit gate and how results and failures are printed.

use anyhow::{anyhow, bail, Context as _, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use adcraft::prompts::PromptCategory;
use adcraft::settings::{LocalStorage, SecretCipher};
use adcraft::{models, styles, Config, ConfigStore, Dispatcher, GenerateRequest, QuickPromptStore};

#[derive(Parser)]
#[command(name = "adcraft", about = "Generate marketing images and copy with AI models")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory (overrides ADCRAFT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Password unlocking configuration changes
    #[arg(long, global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available models
    Models,
    /// List available styles
    Styles,
    /// Show or change the model and API key configuration
    Config(ConfigArgs),
    /// Manage quick prompts
    Prompts(PromptsArgs),
    /// Generate content with the selected model
    Generate(GenerateArgs),
    /// Check that the model's endpoint is reachable
    Health(ModelArgs),
    /// Show usage and quota for a model
    Usage(ModelArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration with masked keys
    Show,
    /// Select the active model
    Select { model_id: String },
    /// Set the API key for a model
    SetKey { model_id: String, key: String },
    /// Set the edit password (an empty value clears it)
    SetPassword { new_password: String },
    /// Remove the edit password
    ResetPassword,
}

impl ConfigCommand {
    /// Everything but `show` needs the edit password
    fn is_mutation(&self) -> bool {
        !matches!(self, ConfigCommand::Show)
    }
}

#[derive(Args)]
pub struct PromptsArgs {
    #[command(subcommand)]
    pub command: PromptsCommand,
}

#[derive(Subcommand)]
pub enum PromptsCommand {
    /// List prompts, optionally for one category
    List {
        #[arg(long)]
        category: Option<PromptCategory>,
    },
    /// List prompt categories
    Categories,
    /// Add a prompt
    Add { category: PromptCategory, text: String },
    /// Replace a prompt's text and category
    Update {
        id: String,
        category: PromptCategory,
        text: String,
    },
    /// Delete a prompt
    Delete { id: String },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Description of what to generate
    #[arg(short, long)]
    pub prompt: String,

    /// Reference image file (repeatable)
    #[arg(short, long = "image")]
    pub images: Vec<PathBuf>,

    /// Style id (repeatable)
    #[arg(short, long = "style")]
    pub styles: Vec<String>,

    /// Model to use instead of the selected one
    #[arg(short, long)]
    pub model: Option<String>,
}

#[derive(Args)]
pub struct ModelArgs {
    /// Model to probe instead of the selected one
    #[arg(short, long)]
    pub model: Option<String>,
}

pub struct Context {
    pub config: Config,
    pub storage: Arc<dyn LocalStorage>,
    pub cipher: Option<SecretCipher>,
    pub password: Option<String>,
}

impl Context {
    async fn config_store(&self) -> ConfigStore {
        ConfigStore::open(self.storage.clone(), self.cipher.clone()).await
    }

    async fn prompt_store(&self) -> QuickPromptStore {
        QuickPromptStore::open(self.storage.clone()).await
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::from_config(&self.config)
    }
}

pub async fn list_models(ctx: &Context) -> Result<()> {
    let store = ctx.config_store().await;

    for status in store.key_statuses() {
        let marker = if store.selected_model() == Some(status.model.id) { "*" } else { " " };
        let key = if status.has_key { status.masked_key.as_str() } else { "(no key)" };
        println!(
            "{} {:<14} {:<14} {:<10} {}",
            marker,
            status.model.id,
            status.model.name,
            status.model.provider.to_string(),
            key
        );
        println!("  {}", status.model.description);
    }
    Ok(())
}

pub fn list_styles() {
    for style in &styles::STYLES {
        println!("{:<10} {:<10} {}", style.id, style.name, style.description);
    }
}

pub async fn config(ctx: &Context, args: ConfigArgs) -> Result<()> {
    let mut store = ctx.config_store().await;

    let command = args.command;
    if command.is_mutation() {
        ensure_unlocked(&store, ctx.password.as_deref())?;
    }

    match command {
        ConfigCommand::Show => show_config(&store),
        ConfigCommand::Select { model_id } => {
            if models::find_model(&model_id).is_none() {
                bail!("Unknown model '{}', see `adcraft models`", model_id);
            }
            store.set_selected_model(Some(model_id.clone())).await;
            println!("Selected {}", model_id);
        }
        ConfigCommand::SetKey { model_id, key } => {
            let key = key.trim();
            store.set_api_key(&model_id, key).await;
            println!("Saved key for {}: {}", model_id, adcraft::mask_api_key(key));
        }
        ConfigCommand::SetPassword { new_password } => {
            store.set_password(&new_password).await?;
            if store.has_password() {
                println!("Password set");
            } else {
                println!("Password cleared");
            }
        }
        ConfigCommand::ResetPassword => {
            store.reset_password().await;
            println!("Password cleared");
        }
    }
    Ok(())
}

fn show_config(store: &ConfigStore) {
    println!("Selected model: {}", store.selected_model().unwrap_or("(none)"));
    println!("Configured:     {}", store.is_configured());
    println!("Password set:   {}", store.has_password());
    for status in store.key_statuses() {
        if status.has_key {
            println!("  {:<14} {}", status.model.id, status.masked_key);
        }
    }
}

fn ensure_unlocked(store: &ConfigStore, password: Option<&str>) -> Result<()> {
    if store.has_password() && !store.verify_password(password.unwrap_or("")) {
        bail!("Configuration is password protected, pass the correct --password");
    }
    Ok(())
}

pub async fn prompts(ctx: &Context, args: PromptsArgs) -> Result<()> {
    let mut store = ctx.prompt_store().await;

    match args.command {
        PromptsCommand::List { category } => {
            let prompts: Vec<_> = match category {
                Some(category) => store.by_category(category),
                None => store.list().iter().collect(),
            };
            for prompt in prompts {
                println!("{:<14} {:<9} {}", prompt.id, prompt.category.id(), prompt.text);
            }
        }
        PromptsCommand::Categories => {
            for category in PromptCategory::ALL {
                println!("{:<9} {}", category.id(), category.display_name());
            }
        }
        PromptsCommand::Add { category, text } => match store.add(&text, category).await {
            Some(prompt) => println!("Added {}", prompt.id),
            None => bail!("Prompt text must not be empty"),
        },
        PromptsCommand::Update { id, category, text } => {
            if !store.update(&id, &text, category).await {
                bail!("No prompt updated: unknown id '{}' or empty text", id);
            }
            println!("Updated {}", id);
        }
        PromptsCommand::Delete { id } => {
            if store.get(&id).is_none() {
                bail!("Unknown prompt id '{}'", id);
            }
            store.delete(&id).await;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

pub async fn generate(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let store = ctx.config_store().await;
    let model_id = resolve_model(&store, args.model)?;
    let api_key = store.api_key(&model_id);
    if api_key.is_empty() {
        bail!("No API key configured for {}, use `adcraft config set-key`", model_id);
    }

    styles::validate_styles(&args.styles)?;

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(image_data_url(path).await?);
    }

    let request = GenerateRequest::new(model_id.as_str(), api_key, args.prompt)
        .with_images(images)
        .with_styles(args.styles);

    info!("Generating with {}", model_id);
    let response = ctx.dispatcher().generate(&request).await;
    if !response.success {
        bail!(response.error.unwrap_or_else(|| "Generation failed".to_string()));
    }

    let data = response.data.unwrap_or_default();
    if data.is_empty() {
        println!("The provider returned no content");
    }
    if let Some(url) = data.image_url {
        println!("Image: {}", url);
    }
    if let Some(text) = data.text {
        println!("{}", text);
    }
    Ok(())
}

pub async fn health(ctx: &Context, args: ModelArgs) -> Result<()> {
    let store = ctx.config_store().await;
    let model_id = resolve_model(&store, args.model)?;

    if ctx
        .dispatcher()
        .check_connection(store.api_key(&model_id), &model_id)
        .await
    {
        println!("{}: reachable", model_id);
        Ok(())
    } else {
        bail!("{}: endpoint not reachable", model_id)
    }
}

pub async fn usage(ctx: &Context, args: ModelArgs) -> Result<()> {
    let store = ctx.config_store().await;
    let model_id = resolve_model(&store, args.model)?;

    let usage = ctx
        .dispatcher()
        .get_usage(store.api_key(&model_id), &model_id)
        .await
        .ok_or_else(|| anyhow!("Could not fetch usage for {}", model_id))?;
    println!("{}", serde_json::to_string_pretty(&usage)?);
    Ok(())
}

fn resolve_model(store: &ConfigStore, requested: Option<String>) -> Result<String> {
    requested
        .or_else(|| store.selected_model().map(str::to_string))
        .ok_or_else(|| anyhow!("No model selected, use `adcraft config select`"))
}

/// Inline an image file as a `data:` URL
async fn image_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {:?}", path))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}
