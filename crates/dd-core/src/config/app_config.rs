use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Application configuration
/// 应用配置
///
/// Every section and key is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Search pipeline tuning
/// 搜索参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: usize,
    /// Delay before a search term reaches the local filter
    pub local_debounce_ms: u64,
    /// Delay before a search term is sent to the server; longer than the local one
    pub remote_debounce_ms: u64,
    /// Shortest trimmed term that is worth a server query
    pub min_remote_term_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a file in the user log directory
    pub file: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            local_debounce_ms: 300,
            remote_debounce_ms: 600,
            min_remote_term_len: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: true }
    }
}

impl AppConfig {
    /// Create AppConfig from TOML text
    /// 从 TOML 文本创建 AppConfig
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SearchConfig {
    pub fn local_debounce(&self) -> Duration {
        Duration::from_millis(self.local_debounce_ms)
    }

    pub fn remote_debounce(&self) -> Duration {
        Duration::from_millis(self.remote_debounce_ms)
    }
}
