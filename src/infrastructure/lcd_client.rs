// LCD REST 客户端
// 账户查询、交易编码、广播以及只读查询
// 每个服务组件都通过 LedgerClient trait 注入客户端，不自行构造

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{BroadcastMode, StdTx, TxError, WrappedStdTx};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("node returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode node response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Transport(err.to_string())
    }
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::Status { status: 404, .. })
    }
}

/// 只读查询的默认映射；404 的含义由调用方决定
impl From<LedgerError> for TxError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) => TxError::Transport(msg),
            other => TxError::InvalidResponse(other.to_string()),
        }
    }
}

/// 远端账本节点契约
///
/// 返回节点原始 JSON，解析由各服务组件完成。
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// GET /auth/accounts/{address}
    async fn account(&self, address: &str) -> Result<Value, LedgerError>;

    /// POST /txs/encode
    async fn encode_tx(&self, tx: &WrappedStdTx) -> Result<Value, LedgerError>;

    /// POST /txs
    async fn broadcast_tx(&self, tx: &StdTx, mode: BroadcastMode) -> Result<Value, LedgerError>;

    /// GET /wasm/contract/{contract}/smart/{hex}
    async fn query_contract_smart(&self, contract: &str, query: &Value)
        -> Result<Value, LedgerError>;

    /// GET /txs/{hash}
    async fn tx_by_hash(&self, hash: &str) -> Result<Value, LedgerError>;

    /// GET /blocks/{height}
    async fn block(&self, height: u64) -> Result<Value, LedgerError>;

    /// GET /txs?{query}
    async fn search_txs(&self, query: &str) -> Result<Value, LedgerError>;
}

#[derive(Serialize)]
struct BroadcastTxBody<'a> {
    tx: &'a StdTx,
    mode: &'static str,
}

pub struct LcdClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LcdClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, LedgerError> {
        tracing::debug!(path = %path, "LCD GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        read_json(response, false).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        keep_error_body: bool,
    ) -> Result<Value, LedgerError> {
        tracing::debug!(path = %path, "LCD POST");
        let response = self
            .http_client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        read_json(response, keep_error_body).await
    }
}

/// 读取 JSON 响应体
///
/// `keep_error_body` 为 true 时，非 2xx 但可解析的 JSON 也原样返回，交给分类器处理。
async fn read_json(response: reqwest::Response, keep_error_body: bool) -> Result<Value, LedgerError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        if keep_error_body {
            if let Ok(json) = serde_json::from_str::<Value>(&body) {
                return Ok(json);
            }
        }
        return Err(LedgerError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| LedgerError::Decode(e.to_string()))
}

#[async_trait]
impl LedgerClient for LcdClient {
    async fn account(&self, address: &str) -> Result<Value, LedgerError> {
        self.get_json(&format!("/auth/accounts/{}", address)).await
    }

    async fn encode_tx(&self, tx: &WrappedStdTx) -> Result<Value, LedgerError> {
        self.post_json("/txs/encode", tx, false).await
    }

    async fn broadcast_tx(&self, tx: &StdTx, mode: BroadcastMode) -> Result<Value, LedgerError> {
        let body = BroadcastTxBody {
            tx,
            mode: mode.as_str(),
        };
        self.post_json("/txs", &body, true).await
    }

    async fn query_contract_smart(
        &self,
        contract: &str,
        query: &Value,
    ) -> Result<Value, LedgerError> {
        let query_bytes =
            serde_json::to_vec(query).map_err(|e| LedgerError::Decode(e.to_string()))?;
        let path = format!(
            "/wasm/contract/{}/smart/{}?encoding=hex",
            contract,
            hex::encode(query_bytes)
        );
        self.get_json(&path).await
    }

    async fn tx_by_hash(&self, hash: &str) -> Result<Value, LedgerError> {
        self.get_json(&format!("/txs/{}", hash)).await
    }

    async fn block(&self, height: u64) -> Result<Value, LedgerError> {
        self.get_json(&format!("/blocks/{}", height)).await
    }

    async fn search_txs(&self, query: &str) -> Result<Value, LedgerError> {
        self.get_json(&format!("/txs?{}", query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = LcdClient::new("http://127.0.0.1:1317/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1317");
        assert_eq!(
            client.url("/txs/encode"),
            "http://127.0.0.1:1317/txs/encode"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let err = LedgerError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!LedgerError::Transport("refused".into()).is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        // 端口 9 (discard) 在测试环境中不会有 LCD 监听
        let client = LcdClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.account("mdse1xyz").await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }
}
