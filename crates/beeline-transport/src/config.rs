use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable consulted for the default gateway.
pub const GATEWAY_URL_ENV: &str = "BEE_GATEWAY_URL";

/// Gateway used when nothing else is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:1633";

/// Where to find the gateway.
///
/// Missing fields take their [`Default`], which honours `BEE_GATEWAY_URL`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub gateway_url: String,
}

impl GatewayConfig {
    pub fn with_url(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
        }
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading gateway config");
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.gateway_url.trim().is_empty() {
            return Err(ConfigError::InvalidUrl("gateway_url is empty".into()));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::with_url(gateway_url_from(std::env::var(GATEWAY_URL_ENV).ok()))
    }
}

fn gateway_url_from(env_value: Option<String>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
}
