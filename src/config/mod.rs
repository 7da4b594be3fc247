//! Layered configuration (files, then `APP__*` environment variables)

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_BASE_URL, GatewayConfig, LogFormat, LoggingConfig, SearchConfig,
};
