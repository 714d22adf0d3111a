//! 单元测试用的节点替身

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::{BroadcastMode, StdTx, WrappedStdTx},
    infrastructure::{LedgerClient, LedgerError},
};

/// 每个接口返回预设 JSON；未设置的接口返回传输错误（账户接口返回 404）
#[derive(Default)]
pub(crate) struct MockLedger {
    pub account: Option<Value>,
    pub encoded: Option<Value>,
    pub broadcast: Option<Value>,
    pub smart: Option<Value>,
    pub tx: Option<Value>,
    pub block: Option<Value>,
    pub search: Option<Value>,
    pub broadcasts: Mutex<Vec<(BroadcastMode, StdTx)>>,
    pub queries: Mutex<Vec<String>>,
}

fn unreachable_node() -> LedgerError {
    LedgerError::Transport("connection refused".to_string())
}

fn not_found() -> LedgerError {
    LedgerError::Status {
        status: 404,
        body: "not found".to_string(),
    }
}

impl MockLedger {
    pub fn recorded_broadcasts(&self) -> Vec<(BroadcastMode, StdTx)> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn account(&self, _address: &str) -> Result<Value, LedgerError> {
        self.account.clone().ok_or_else(not_found)
    }

    async fn encode_tx(&self, _tx: &WrappedStdTx) -> Result<Value, LedgerError> {
        self.encoded.clone().ok_or_else(unreachable_node)
    }

    async fn broadcast_tx(&self, tx: &StdTx, mode: BroadcastMode) -> Result<Value, LedgerError> {
        self.broadcasts.lock().unwrap().push((mode, tx.clone()));
        self.broadcast.clone().ok_or_else(unreachable_node)
    }

    async fn query_contract_smart(
        &self,
        contract: &str,
        query: &Value,
    ) -> Result<Value, LedgerError> {
        self.queries
            .lock()
            .unwrap()
            .push(format!("{}:{}", contract, query));
        self.smart.clone().ok_or_else(unreachable_node)
    }

    async fn tx_by_hash(&self, _hash: &str) -> Result<Value, LedgerError> {
        self.tx.clone().ok_or_else(not_found)
    }

    async fn block(&self, _height: u64) -> Result<Value, LedgerError> {
        self.block.clone().ok_or_else(not_found)
    }

    async fn search_txs(&self, query: &str) -> Result<Value, LedgerError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.search.clone().ok_or_else(unreachable_node)
    }
}
