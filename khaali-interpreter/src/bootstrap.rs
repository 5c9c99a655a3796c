use std::{env, str::FromStr};

use tracing_subscriber::EnvFilter;

const VIEWER_ADDRESS_VAR: &str = "KHAALI_VIEWER_ADDRESS";
const OUTPUT_VAR: &str = "KHAALI_OUTPUT";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("{OUTPUT_VAR} must be `text` or `json`, got `{other}`")),
        }
    }
}

/// Application configuration
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub viewer_address: Option<String>,
    pub output: OutputFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let viewer_address = lookup(VIEWER_ADDRESS_VAR)
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty());
        let output = match lookup(OUTPUT_VAR) {
            Some(value) => value.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            viewer_address,
            output,
        })
    }
}

/// Initialize logging. Logs go to stderr so stdout stays machine-readable.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
