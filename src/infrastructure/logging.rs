//! 日志系统配置模块
//! 支持结构化日志和日志级别配置

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的级别
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true).with_ansi(true))
            .try_init()?;
    }

    Ok(())
}
