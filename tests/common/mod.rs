//! 测试辅助模块
//! 内存密钥存储、脚本化节点替身和测试用应用状态

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use cosmwasm_signer::{
    app_state::AppState,
    config::{ChainConfig, Config, KeyStoreConfig, LoggingConfig, ServerConfig},
    domain::{BroadcastMode, StdTx, TxError, TxResult, WrappedStdTx},
    infrastructure::{KeyStore, LedgerClient, LedgerError},
};
use serde_json::Value;
use zeroize::Zeroizing;

pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[derive(Default)]
pub struct MemoryKeyStore {
    keys: HashMap<String, String>,
}

impl MemoryKeyStore {
    pub fn with_key(mut self, name: &str, mnemonic: &str) -> Self {
        self.keys.insert(name.to_string(), mnemonic.to_string());
        self
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn lookup(&self, name: &str) -> TxResult<Zeroizing<String>> {
        self.keys
            .get(name)
            .map(|m| Zeroizing::new(m.clone()))
            .ok_or_else(|| TxError::KeyNotFound(name.to_string()))
    }
}

/// 节点替身：按接口预设响应，记录所有广播和检索请求
#[derive(Default)]
pub struct ScriptedLedger {
    pub accounts: HashMap<String, Value>,
    pub encoded: Option<Value>,
    pub broadcast: Option<Value>,
    pub smart: Option<Value>,
    pub txs: HashMap<String, Value>,
    pub blocks: HashMap<u64, Value>,
    pub search: Option<Value>,
    pub broadcasts: Mutex<Vec<(BroadcastMode, StdTx)>>,
    pub searches: Mutex<Vec<String>>,
}

fn refused() -> LedgerError {
    LedgerError::Transport("connection refused".to_string())
}

fn not_found() -> LedgerError {
    LedgerError::Status {
        status: 404,
        body: r#"{"error":"not found"}"#.to_string(),
    }
}

impl ScriptedLedger {
    pub fn with_account(mut self, address: &str, account_number: u64, sequence: u64) -> Self {
        self.accounts.insert(
            address.to_string(),
            serde_json::json!({
                "height": "100",
                "result": {
                    "type": "cosmos-sdk/Account",
                    "value": {
                        "address": address,
                        "coins": [],
                        "public_key": null,
                        "account_number": account_number.to_string(),
                        "sequence": sequence.to_string()
                    }
                }
            }),
        );
        self
    }

    pub fn broadcasts(&self) -> Vec<(BroadcastMode, StdTx)> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn account(&self, address: &str) -> Result<Value, LedgerError> {
        self.accounts.get(address).cloned().ok_or_else(not_found)
    }

    async fn encode_tx(&self, _tx: &WrappedStdTx) -> Result<Value, LedgerError> {
        self.encoded.clone().ok_or_else(refused)
    }

    async fn broadcast_tx(&self, tx: &StdTx, mode: BroadcastMode) -> Result<Value, LedgerError> {
        self.broadcasts.lock().unwrap().push((mode, tx.clone()));
        self.broadcast.clone().ok_or_else(refused)
    }

    async fn query_contract_smart(
        &self,
        _contract: &str,
        _query: &Value,
    ) -> Result<Value, LedgerError> {
        self.smart.clone().ok_or_else(refused)
    }

    async fn tx_by_hash(&self, hash: &str) -> Result<Value, LedgerError> {
        self.txs.get(hash).cloned().ok_or_else(not_found)
    }

    async fn block(&self, height: u64) -> Result<Value, LedgerError> {
        self.blocks.get(&height).cloned().ok_or_else(not_found)
    }

    async fn search_txs(&self, query: &str) -> Result<Value, LedgerError> {
        self.searches.lock().unwrap().push(query.to_string());
        self.search.clone().ok_or_else(refused)
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
        },
        chain: ChainConfig {
            chain_id: "mdse".to_string(),
            lcd_url: "http://127.0.0.1:1317".to_string(),
            bech32_prefix: "mdse".to_string(),
            fee_denom: "umdse".to_string(),
            request_timeout_secs: 5,
        },
        keystore: KeyStoreConfig {
            keys_dir: "./keys".to_string(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
        },
    }
}

pub fn test_state(ledger: Arc<ScriptedLedger>, keystore: MemoryKeyStore) -> Arc<AppState> {
    Arc::new(AppState::with_components(
        Arc::new(test_config()),
        ledger,
        Arc::new(keystore),
    ))
}
