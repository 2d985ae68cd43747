//! # Configuration DTOs / 配置数据结构
//!
//! Pure data: TOML → DTO mapping plus the built-in defaults. Reading files
//! and environment overrides happen in the bootstrap layer.

mod app_config;

pub use app_config::{ApiConfig, AppConfig, LoggingConfig, SearchConfig, DEFAULT_API_BASE_URL};
