//! # Dependency Injection / 依赖注入模块
//!
//! - Create the HTTP adapters from the loaded config / 根据配置创建 HTTP 适配器
//! - Group them as ports in [`AppDeps`] / 以端口形式注入 AppDeps
//!
//! No business logic here: decisions belong to the use cases.

use std::sync::Arc;

use anyhow::Context;
use dd_app::AppDeps;
use dd_core::config::AppConfig;
use dd_core::ports::SearchEventPort;
use dd_infra::{ApiClient, HttpChatApi, HttpDocumentApi, HttpUploadApi};
use tracing::info;

/// Build every adapter against `config.api` and wrap them as ports.
pub fn wire_dependencies(
    config: &AppConfig,
    search_events: Arc<dyn SearchEventPort>,
) -> anyhow::Result<AppDeps> {
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;
    info!(base_url = %client.base_url(), "API client ready");

    Ok(AppDeps {
        documents: Arc::new(HttpDocumentApi::new(client.clone())),
        uploads: Arc::new(HttpUploadApi::new(client.clone())),
        chat: Arc::new(HttpChatApi::new(client)),
        search_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_core::ports::NoopSearchEvents;

    #[test]
    fn wires_with_default_config() {
        let deps = wire_dependencies(&AppConfig::default(), Arc::new(NoopSearchEvents));
        assert!(deps.is_ok());
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let mut config = AppConfig::default();
        config.api.base_url = "::not a url::".to_string();

        let err = wire_dependencies(&config, Arc::new(NoopSearchEvents))
            .err()
            .expect("expected wiring to fail");
        assert!(format!("{err:#}").contains("Invalid API base URL"));
    }
}
