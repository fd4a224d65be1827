use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Text};
use runlayers_core::{Config, Overrides, RunMode, run_job};
use std::{
    convert::Infallible,
    path::{Path, PathBuf},
};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "runlayers",
    version,
    about = "Post today's weather and running layers to a chat webhook"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = "RUNLAYERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the forecast, build the message and post it.
    Run {
        /// Print the message instead of posting it.
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Interactively write location, webhook and AI settings to the config file.
    Configure,

    /// Print the effective configuration with secrets masked.
    ShowConfig {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Settings that the environment or flags can override.
#[derive(Debug, Default, Args)]
pub struct OverrideArgs {
    #[arg(long, env = "LAT", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[arg(long, env = "LON", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Display name used in the message header.
    #[arg(long = "location", env = "LOCATION_NAME")]
    pub location_name: Option<String>,

    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Exactly "true" (any case) enables model-generated advice.
    #[arg(long, env = "ENABLE_AI", value_parser = parse_enable_flag)]
    pub enable_ai: Option<bool>,

    #[arg(long, env = "GH_MODELS_TOKEN", hide_env_values = true)]
    pub ai_token: Option<String>,

    #[arg(long, env = "AI_MODEL")]
    pub ai_model: Option<String>,

    #[arg(long, env = "AI_ENDPOINT")]
    pub ai_endpoint: Option<String>,
}

fn parse_enable_flag(value: &str) -> Result<bool, Infallible> {
    Ok(value.eq_ignore_ascii_case("true"))
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Overrides {
            latitude: args.latitude,
            longitude: args.longitude,
            location_name: args.location_name,
            webhook_url: args.webhook_url,
            ai_enabled: args.enable_ai,
            ai_token: args.ai_token,
            ai_model: args.ai_model,
            ai_endpoint: args.ai_endpoint,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Run { dry_run, overrides } => {
                let config = Config::load_from(&config_path)?.apply(overrides.into());
                let mode = if dry_run {
                    RunMode::DryRun
                } else {
                    RunMode::Deliver
                };

                let report = run_job(&config, mode).await?;
                if !report.delivered {
                    println!("{}", report.message);
                }
            }
            Command::Configure => configure(&config_path)?,
            Command::ShowConfig { overrides } => {
                let config = Config::load_from(&config_path)?.apply(overrides.into());
                let shown = toml::to_string_pretty(&config.redacted())
                    .context("Failed to serialize configuration to TOML")?;
                println!("# {}\n{shown}", config_path.display());
            }
        }

        Ok(())
    }
}

fn configure(path: &Path) -> Result<()> {
    let mut config = Config::load_from(path)?;

    config.location_name = Text::new("Location name:")
        .with_default(&config.location_name)
        .prompt()?;
    config.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.latitude)
        .with_error_message("Please enter a decimal latitude")
        .prompt()?;
    config.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.longitude)
        .with_error_message("Please enter a decimal longitude")
        .prompt()?;

    let webhook = Text::new("Webhook URL:")
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !webhook.trim().is_empty() {
        config.webhook_url = Some(webhook.trim().to_string());
    }

    config.ai.enabled = Confirm::new("Generate advice with a language model?")
        .with_default(config.ai.enabled)
        .prompt()?;
    if config.ai.enabled {
        let token = Password::new("Model API token:")
            .without_confirmation()
            .with_help_message("Leave empty to keep the current value")
            .prompt()?;
        if !token.trim().is_empty() {
            config.ai.token = Some(token.trim().to_string());
        }
    }

    config
        .validate(false)
        .context("Refusing to save an invalid configuration")?;
    config.save_to(path)?;
    info!(path = %path.display(), "Configuration saved");

    Ok(())
}
