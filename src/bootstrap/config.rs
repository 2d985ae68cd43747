//! # Configuration Loader / 配置加载器
//!
//! - Read the TOML file into the [`AppConfig`] DTO / 读取 TOML 到 AppConfig
//! - Apply environment overrides / 应用环境变量覆盖
//!
//! Missing sections and keys fall back to the DTO defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use dd_core::config::AppConfig;
use tracing::debug;

/// Environment variable that overrides `[api] base_url`.
pub const API_URL_ENV: &str = "DOCDESK_API_URL";

const CONFIG_FILE_NAME: &str = "docdesk.toml";

/// `<config dir>/docdesk/docdesk.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docdesk").join(CONFIG_FILE_NAME))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML, or does not map onto [`AppConfig`]
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Pick the configuration for this run.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise. Environment overrides are
/// applied last.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => load_config(&path)?,
            None => {
                debug!("no config file found, using defaults");
                AppConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply overrides from `lookup` (normally the process environment).
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
        debug!(base_url = %url, "API base URL overridden from environment");
        config.api.base_url = url.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_core::config::DEFAULT_API_BASE_URL;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [api]
            base_url = "https://docs.example.com/api/v1"
            timeout_secs = 5

            [search]
            page_size = 12
            remote_debounce_ms = 800

            [logging]
            file = false
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://docs.example.com/api/v1");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.search.page_size, 12);
        assert_eq!(config.search.remote_debounce_ms, 800);
        assert_eq!(config.search.local_debounce_ms, 300);
        assert!(!config.logging.file);
    }

    #[test]
    fn test_load_config_reports_path_on_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[api\nbase_url = ").unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = resolve_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_env_override_replaces_base_url() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == API_URL_ENV).then(|| " http://10.0.0.5:8000/api/v1 ".to_string())
        });
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api/v1");

        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }
}
