use std::time::Duration;

use serde::{Deserialize, Serialize};

use onx_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use onx_common::games::tictactoe::BoardConfig;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "onx_server.yaml";

pub type ServerConfigManager =
    ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer>;

pub fn get_config_manager(path: &str) -> ServerConfigManager {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_ttl_secs: u64,
    pub reconnect_grace_secs: u64,
    pub cleanup_interval_secs: u64,
    pub outbound_buffer: usize,
    pub default_board: BoardConfig,
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn reconnect_grace(&self) -> Duration {
        Duration::from_secs(self.reconnect_grace_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            session_ttl_secs: 3600,
            reconnect_grace_secs: 15,
            cleanup_interval_secs: 300,
            outbound_buffer: 64,
            default_board: BoardConfig::default(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.session_ttl_secs == 0 {
            return Err("session_ttl_secs must be greater than zero".to_string());
        }
        if self.cleanup_interval_secs == 0 {
            return Err("cleanup_interval_secs must be greater than zero".to_string());
        }
        if self.outbound_buffer == 0 {
            return Err("outbound_buffer must be at least 1".to_string());
        }
        self.default_board
            .validate()
            .map_err(|e| format!("default_board: {}", e))
    }
}
