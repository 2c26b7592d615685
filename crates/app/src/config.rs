use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/budgetbox.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base API url of the collaborator backend.
    pub base_url: String,
    /// Bearer token for the static token provider (also read from
    /// `BUDGETBOX_TOKEN`; never passed on the CLI).
    pub token: String,
    /// Publishable client key of the auth provider, for reference in
    /// diagnostics. Not a secret.
    pub publishable_key: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            token: String::new(),
            publishable_key: String::new(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "budgetbox", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base API url (e.g. http://127.0.0.1:8000/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override log level.
    #[arg(long)]
    level: Option<String>,
}

pub fn load() -> Result<AppConfig, config::ConfigError> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BUDGETBOX"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok(settings)
}
