//! JSON configuration: an ordered list of input steps and output steps.
//!
//! The config file may live on disk or behind an HTTP(S) URL. Each step
//! names a converter type, an action and a type-specific argument blob
//! that the converter's builder deserializes itself.

use anyhow::{ensure, Context, Result};
use dlc_interface::{config::Value, Action};
use serde::{de, Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: Vec<ConfigItem>,
    #[serde(default)]
    pub output: Vec<ConfigItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigItem {
    #[serde(rename = "type")]
    pub format: String,
    pub action: Action,
    pub args: Value,
}

impl<'de> Deserialize<'de> for ConfigItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type")]
            format: String,
            action: String,
            #[serde(default)]
            args: Value,
        }

        let raw = Raw::deserialize(deserializer)?;

        let format = raw.format.trim().to_string();
        if format.is_empty() {
            return Err(de::Error::custom("type is required"));
        }
        let action = raw.action.trim();
        if action.is_empty() {
            return Err(de::Error::custom("action is required"));
        }
        let action = action.parse::<Action>().map_err(de::Error::custom)?;

        Ok(ConfigItem {
            format,
            action,
            args: raw.args,
        })
    }
}

/// Load the config from a local path or an `http(s)://` URL.
pub async fn load_config(uri: &str) -> Result<Config> {
    let uri = uri.trim();
    ensure!(!uri.is_empty(), "config file is required");

    let lower = uri.to_lowercase();
    let bytes = if lower.starts_with("http://") || lower.starts_with("https://") {
        reqwest::get(uri)
            .await
            .and_then(|response| response.error_for_status())
            .context("failed to download config")?
            .bytes()
            .await
            .context("failed to read config uri")?
            .to_vec()
    } else {
        tokio::fs::read(uri)
            .await
            .with_context(|| format!("failed to read config file {}", uri))?
    };

    serde_json::from_slice(&bytes).context("failed to parse config")
}
