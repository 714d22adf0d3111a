//! 只读链上查询：cw20 余额、交易、区块

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    domain::{TxError, TxResult},
    infrastructure::{LedgerClient, LedgerError},
};

use super::input_guard::{check_bech32_value, check_tx_hash};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cw20Balance {
    pub balance: String,
}

fn not_found_or(err: LedgerError, what: String) -> TxError {
    if err.is_not_found() {
        TxError::NotFound(what)
    } else {
        err.into()
    }
}

/// 老版本节点把结果放在 `result.smart`（base64 JSON）里，新版本直接返回 JSON
fn unwrap_smart_result(raw: Value) -> TxResult<Value> {
    let result = match raw {
        Value::Object(mut map) => map.remove("result").unwrap_or(Value::Null),
        other => other,
    };

    match result.get("smart").and_then(Value::as_str) {
        Some(encoded) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| TxError::InvalidResponse(format!("smart result is not base64: {}", e)))?;
            serde_json::from_slice(&bytes)
                .map_err(|e| TxError::InvalidResponse(format!("smart result is not JSON: {}", e)))
        }
        None => Ok(result),
    }
}

/// 合约 `{"balance": {"address": ...}}` 查询
pub async fn query_cw20_balance(
    ledger: &dyn LedgerClient,
    contract: &str,
    address: &str,
) -> TxResult<Cw20Balance> {
    check_bech32_value("contract", contract)?;
    check_bech32_value("address", address)?;

    let query = json!({ "balance": { "address": address } });
    let raw = ledger
        .query_contract_smart(contract, &query)
        .await
        .map_err(|e| not_found_or(e, format!("contract {}", contract)))?;

    serde_json::from_value(unwrap_smart_result(raw)?)
        .map_err(|e| TxError::InvalidResponse(format!("unexpected balance response: {}", e)))
}

/// 原样返回节点的交易记录
pub async fn get_transaction(ledger: &dyn LedgerClient, hash: &str) -> TxResult<Value> {
    check_tx_hash(hash)?;

    ledger
        .tx_by_hash(hash)
        .await
        .map_err(|e| not_found_or(e, format!("transaction {}", hash)))
}

#[derive(Debug, Deserialize)]
struct BlockResponse {
    block: BlockBody,
}

#[derive(Debug, Deserialize)]
struct BlockBody {
    data: BlockData,
}

#[derive(Debug, Deserialize)]
struct BlockData {
    #[serde(default)]
    txs: Option<Vec<String>>,
}

/// 区块内的 base64 交易列表；空块返回空列表
pub async fn get_block_txs(ledger: &dyn LedgerClient, height: u64) -> TxResult<Vec<String>> {
    let raw = ledger
        .block(height)
        .await
        .map_err(|e| not_found_or(e, format!("block {}", height)))?;

    let block: BlockResponse = serde_json::from_value(raw)
        .map_err(|e| TxError::InvalidResponse(format!("malformed block response: {}", e)))?;
    Ok(block.block.data.txs.unwrap_or_default())
}
