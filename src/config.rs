//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub keystore: KeyStoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// 链与 LCD 节点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: String,
    /// LCD REST 地址
    pub lcd_url: String,
    pub bech32_prefix: String,
    /// 费用最小单位
    pub fee_denom: String,
    pub request_timeout_secs: u64,
}

/// 助记词文件目录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStoreConfig {
    pub keys_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: std::env::var("CHAIN_ID").unwrap_or_else(|_| "mdse".into()),
            lcd_url: std::env::var("LCD_URL").unwrap_or_else(|_| "http://127.0.0.1:1317".into()),
            bech32_prefix: std::env::var("BECH32_PREFIX").unwrap_or_else(|_| "mdse".into()),
            fee_denom: std::env::var("FEE_DENOM").unwrap_or_else(|_| "umdse".into()),
            request_timeout_secs: std::env::var("LCD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            keys_dir: std::env::var("KEYS_DIR").unwrap_or_else(|_| "./keys".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            chain: ChainConfig::default(),
            keystore: KeyStoreConfig::default(),
            logging: LoggingConfig::default(),
        })
    }

    /// 从配置文件加载配置（缺失的段落回落到环境变量默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    ///
    /// 指定了路径但文件不存在时直接报错，不回落到环境变量
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.as_ref().exists() {
                    anyhow::bail!("CONFIG_PATH points to a missing file: {:?}", path.as_ref());
                }
                Self::from_file(path)?
            }
            None => Self::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.chain.chain_id.trim().is_empty() {
            anyhow::bail!("CHAIN_ID must not be empty");
        }

        if !self.chain.lcd_url.starts_with("http://") && !self.chain.lcd_url.starts_with("https://")
        {
            anyhow::bail!("LCD_URL must start with http:// or https://");
        }

        if self.chain.bech32_prefix.trim().is_empty() {
            anyhow::bail!("BECH32_PREFIX must not be empty");
        }

        if self.chain.fee_denom.trim().is_empty() {
            anyhow::bail!("FEE_DENOM must not be empty");
        }

        if self.chain.request_timeout_secs == 0 {
            anyhow::bail!("LCD_TIMEOUT_SECS must be greater than 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}
