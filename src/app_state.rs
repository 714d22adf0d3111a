use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    infrastructure::{FileKeyStore, KeyStore, LcdClient, LedgerClient},
};

/// 应用状态
/// 只读共享：配置、节点客户端、密钥存储
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<dyn LedgerClient>,
    pub keystore: Arc<dyn KeyStore>,
}

impl AppState {
    /// 按配置构造真实的 LCD 客户端和文件密钥存储
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let ledger = LcdClient::new(
            &config.chain.lcd_url,
            Duration::from_secs(config.chain.request_timeout_secs),
        )?;
        let keystore = FileKeyStore::new(&config.keystore.keys_dir);

        Ok(Self::with_components(
            config,
            Arc::new(ledger),
            Arc::new(keystore),
        ))
    }

    /// 注入任意实现（测试替身）
    pub fn with_components(
        config: Arc<Config>,
        ledger: Arc<dyn LedgerClient>,
        keystore: Arc<dyn KeyStore>,
    ) -> Self {
        Self {
            config,
            ledger,
            keystore,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain.chain_id
    }

    pub fn bech32_prefix(&self) -> &str {
        &self.config.chain.bech32_prefix
    }

    pub fn fee_denom(&self) -> &str {
        &self.config.chain.fee_denom
    }
}
