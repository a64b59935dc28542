//! TOML file configuration structures.
//!
//! These structs directly map to the `coursepay.toml` file format.

use std::path::{Path, PathBuf};

use coursepay_core::checkout::ReceivingDetails;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub receiving: ReceivingDetails,
}

/// Backend API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL of the marketplace REST API.
    pub base_url: Url,
}

/// Local durable-state section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cart and notification snapshots.
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".coursepay")
}

/// Load and parse the configuration file.
pub fn load(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read config file {}: {e}", path.display()))?;
    let config = toml::from_str(&raw)?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml_str = r#"
[api]
base_url = "https://api.coursepay.example.com"

[storage]
dir = "/var/lib/coursepay"

[receiving.bank]
bank_name = "Vietcombank"
account_number = "0071000123456"
account_holder = "COURSEPAY JSC"

[receiving.crypto]
network = "USDT (TRC-20)"
address = "TXYZabc123"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url.host_str(), Some("api.coursepay.example.com"));
        assert_eq!(config.storage.dir, PathBuf::from("/var/lib/coursepay"));
        assert_eq!(config.receiving.bank.bank_name, "Vietcombank");
        assert_eq!(config.receiving.crypto.network, "USDT (TRC-20)");
    }

    #[test]
    fn storage_section_is_optional() {
        let toml_str = r#"
[api]
base_url = "http://localhost:8080"

[receiving.bank]
bank_name = "Bank"
account_number = "1"
account_holder = "H"

[receiving.crypto]
network = "N"
address = "A"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.dir, PathBuf::from(".coursepay"));
    }
}
