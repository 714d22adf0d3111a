//! 交易哈希
//!
//! 编码由节点完成，摘要在本地计算：SHA-256(encoded bytes)，大写十六进制。

use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{
    domain::{StdTx, TxError, TxResult, WrappedStdTx},
    infrastructure::LedgerClient,
};

#[derive(Debug, Deserialize)]
struct EncodeTxResponse {
    tx: String,
}

/// 纯函数：同样的编码字节总是得到同样的哈希
pub fn tx_hash_from_encoded(encoded: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(encoded))
}

/// 请求节点编码后计算哈希；编码失败时不返回占位哈希
pub async fn compute_tx_hash(ledger: &dyn LedgerClient, tx: &StdTx) -> TxResult<String> {
    let wrapped = WrappedStdTx::from(tx.clone());

    let raw = ledger.encode_tx(&wrapped).await.map_err(|e| {
        tracing::warn!(error = %e, "tx_encode_failed");
        TxError::EncodingUnavailable(e.to_string())
    })?;

    let response: EncodeTxResponse = serde_json::from_value(raw)
        .map_err(|e| TxError::EncodingUnavailable(format!("malformed encode response: {}", e)))?;
    let encoded = base64::engine::general_purpose::STANDARD
        .decode(response.tx.as_bytes())
        .map_err(|e| TxError::EncodingUnavailable(format!("encoded tx is not base64: {}", e)))?;

    Ok(tx_hash_from_encoded(&encoded))
}
