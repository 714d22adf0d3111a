//! cw20 转账事件检索
//!
//! 通过节点的交易检索接口按合约、收发地址和高度区间过滤，
//! 把成功交易中的每条合约执行消息展开为一条事件。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{TxError, TxResult, Uint64Value},
    infrastructure::LedgerClient,
};

// 地址和合约只允许 bech32 字符，避免拼接出额外的查询参数
use super::input_guard::check_bech32_value;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

const EXECUTE_CONTRACT_TYPE: &str = "wasm/MsgExecuteContract";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferEventFilter {
    pub contract_address: String,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub min_height: Option<u64>,
    pub max_height: Option<u64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub height: String,
    pub tx_hash: String,
    /// 消息在交易内的位置
    pub index: usize,
    pub contract: String,
    pub from_address: String,
    pub to_address: Option<String>,
    pub amount: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEventPage {
    pub count: u64,
    pub limit: u64,
    pub page_number: u64,
    pub page_total: u64,
    pub total_count: u64,
    pub items: Vec<TransferEvent>,
}

pub fn build_transfer_event_query(filter: &TransferEventFilter) -> TxResult<String> {
    check_bech32_value("contract_address", &filter.contract_address)?;

    let page = filter.page.unwrap_or(DEFAULT_PAGE);
    let limit = filter.limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 || limit == 0 {
        return Err(TxError::InvalidInput(
            "page and limit must be positive".to_string(),
        ));
    }

    let mut query = format!(
        "message.action=execute&wasm.action=transfer&wasm.contract_address={}&page={}&limit={}",
        filter.contract_address, page, limit
    );

    if let Some(from) = &filter.from_address {
        check_bech32_value("from_address", from)?;
        query.push_str(&format!("&wasm.from={}", from));
    }
    if let Some(to) = &filter.to_address {
        check_bech32_value("to_address", to)?;
        query.push_str(&format!("&wasm.to={}", to));
    }
    if let Some(min) = filter.min_height {
        query.push_str(&format!("&tx.minheight={}", min));
    }
    if let Some(max) = filter.max_height {
        query.push_str(&format!("&tx.maxheight={}", max));
    }

    Ok(query)
}

#[derive(Debug, Deserialize)]
struct SearchTxsResponse {
    #[serde(default)]
    total_count: Option<Uint64Value>,
    #[serde(default)]
    count: Option<Uint64Value>,
    #[serde(default)]
    page_number: Option<Uint64Value>,
    #[serde(default)]
    page_total: Option<Uint64Value>,
    #[serde(default)]
    limit: Option<Uint64Value>,
    /// 逐条解析，单条格式异常不影响整页
    #[serde(default)]
    txs: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    height: Uint64Value,
    txhash: String,
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    timestamp: Option<String>,
    tx: TxEnvelope,
}

#[derive(Debug, Deserialize)]
struct TxEnvelope {
    value: TxBody,
}

#[derive(Debug, Deserialize)]
struct TxBody {
    #[serde(default)]
    msg: Vec<RawMsg>,
}

#[derive(Debug, Deserialize)]
struct RawMsg {
    #[serde(rename = "type")]
    msg_type: String,
    #[serde(default)]
    value: Value,
}

fn counter(value: Option<Uint64Value>) -> u64 {
    value.and_then(|v| v.to_u64().ok()).unwrap_or(0)
}

fn height_string(height: &Uint64Value) -> String {
    match height {
        Uint64Value::Number(n) => n.to_string(),
        Uint64Value::Text(s) => s.clone(),
    }
}

fn transfer_field(msg: &Value, field: &str) -> Option<String> {
    msg.get("msg")
        .and_then(|m| m.get("transfer"))
        .and_then(|t| t.get(field))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_txs(raw: Vec<Value>) -> Vec<TxResponse> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(position, tx)| match serde_json::from_value::<TxResponse>(tx) {
            Ok(tx) => Some(tx),
            Err(e) => {
                tracing::warn!(position, error = %e, "skipping_malformed_search_tx");
                None
            }
        })
        .collect()
}

fn collect_events(txs: Vec<TxResponse>) -> Vec<TransferEvent> {
    let mut items = Vec::new();

    // 带非零错误码的交易没有生效
    for tx in txs.into_iter().filter(|tx| tx.code.unwrap_or(0) == 0) {
        for (index, msg) in tx.tx.value.msg.iter().enumerate() {
            if msg.msg_type != EXECUTE_CONTRACT_TYPE {
                continue;
            }
            let contract = msg.value.get("contract").and_then(Value::as_str);
            let sender = msg.value.get("sender").and_then(Value::as_str);
            let (Some(contract), Some(sender)) = (contract, sender) else {
                continue;
            };

            items.push(TransferEvent {
                height: height_string(&tx.height),
                tx_hash: tx.txhash.clone(),
                index,
                contract: contract.to_string(),
                from_address: sender.to_string(),
                to_address: transfer_field(&msg.value, "recipient"),
                amount: transfer_field(&msg.value, "amount"),
                timestamp: tx.timestamp.clone(),
            });
        }
    }

    items
}

pub async fn search_transfer_events(
    ledger: &dyn LedgerClient,
    filter: &TransferEventFilter,
) -> TxResult<TransferEventPage> {
    let query = build_transfer_event_query(filter)?;
    tracing::debug!(query = %query, "searching_transfer_events");

    let raw = ledger.search_txs(&query).await?;
    let response: SearchTxsResponse = serde_json::from_value(raw)
        .map_err(|e| TxError::InvalidResponse(format!("malformed tx search response: {}", e)))?;

    Ok(TransferEventPage {
        count: counter(response.count),
        limit: counter(response.limit),
        page_number: counter(response.page_number),
        page_total: counter(response.page_total),
        total_count: counter(response.total_count),
        items: collect_events(parse_txs(response.txs.unwrap_or_default())),
    })
}
