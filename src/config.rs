use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};
use url::Url;

use crate::{error::HmError, hmid::HYPERMEDIA_PUBLIC_WEB_GATEWAY};

/// Environment variable overriding the configured gateway in the CLI.
pub const GATEWAY_URL_ENV: &str = "HM_GATEWAY_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            gateway_url: default_gateway_url(),
        }
    }
}

fn default_gateway_url() -> String {
    HYPERMEDIA_PUBLIC_WEB_GATEWAY.to_string()
}

/// Validate a gateway origin and strip its trailing `/`.
///
/// Gateway links are recognized by prefix, so the stored value must look exactly like the
/// host part of the web URLs this crate writes.
pub fn normalize_gateway_url(raw: &str) -> Result<String, HmError> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HmError::Config(format!(
            "gateway must be an http(s) URL, got '{raw}'"
        )));
    }
    if url.host_str().is_none() {
        return Err(HmError::Config(format!("gateway '{raw}' has no host")));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

pub trait GatewayConfigProvider: Send + Sync {
    fn get_gateway_url(&self) -> Result<String, HmError>;
    fn set_gateway_url(&self, gateway_url: &str) -> Result<(), HmError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }

    pub fn load(&self) -> Result<GatewayConfig, HmError> {
        tracing::debug!("Attempting to read gateway config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using the public gateway.");
            return Ok(GatewayConfig::default());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl GatewayConfigProvider for TomlConfigProvider {
    fn get_gateway_url(&self) -> Result<String, HmError> {
        normalize_gateway_url(&self.load()?.gateway_url)
    }

    fn set_gateway_url(&self, gateway_url: &str) -> Result<(), HmError> {
        tracing::debug!("Attempting to write gateway config to: {:?}", &self.path);
        let config = GatewayConfig {
            gateway_url: normalize_gateway_url(gateway_url)?,
        };
        write(&self.path, toml::to_string(&config)?)?;
        Ok(())
    }
}
