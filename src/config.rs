use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

/// Terminal viewer for NBA game predictions
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the prediction backend
    #[arg(long, env = "PREDICTOR_API_URL", default_value = "http://localhost:5050")]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "PREDICTOR_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// File that receives the log output (the terminal is taken by the UI)
    #[arg(long, env = "PREDICTOR_LOG_FILE", default_value = "nba-predictor.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.api_url)
            .with_context(|| format!("invalid api url '{}'", self.api_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("api url must be http or https, got '{}'", base.scheme());
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn predictions_url(&self) -> Result<Url> {
        let endpoint = format!("{}/api/predictions", self.api_url.trim_end_matches('/'));
        Url::parse(&endpoint).with_context(|| format!("invalid predictions url '{}'", endpoint))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
