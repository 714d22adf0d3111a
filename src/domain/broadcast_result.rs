//! 广播结果分类
//!
//! 节点响应只能落入 Success / Failure / TransportError 之一。
//! 既不是成功形态也不是失败形态的响应是 `TxError::Classification`，原始响应保留在错误里。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    amino::Uint64Value,
    errors::{TxError, TxResult},
};

/// 广播模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// 等待区块包含
    Block,
    /// 等待 CheckTx
    Sync,
    /// 进入内存池即返回
    Async,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastMode::Block => "block",
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BroadcastResult {
    /// 异步模式下表示“已接受”，不代表已确认
    Success {
        height: u64,
        tx_hash: String,
        raw_log: String,
    },
    Failure {
        code: u32,
        raw_log: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_hash: Option<String>,
    },
    TransportError { message: String },
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BroadcastResult::Success { .. })
    }
}

/// 节点广播响应（只取分类需要的字段）
#[derive(Debug, Deserialize)]
struct RawBroadcastResponse {
    #[serde(default)]
    height: Option<Uint64Value>,
    #[serde(default)]
    txhash: Option<String>,
    #[serde(default)]
    code: Option<u32>,
    #[serde(default, alias = "rawLog")]
    raw_log: Option<String>,
}

/// 把节点响应分类为成功或失败
///
/// - 存在非零错误码 => Failure
/// - 无错误码且带 txhash => Success
/// - 其他形态 => Classification 错误
pub fn classify_broadcast_response(raw: Value) -> TxResult<BroadcastResult> {
    let parsed: RawBroadcastResponse = match serde_json::from_value(raw.clone()) {
        Ok(parsed) => parsed,
        Err(_) => return Err(TxError::Classification { raw }),
    };

    if let Some(code) = parsed.code.filter(|c| *c != 0) {
        return Ok(BroadcastResult::Failure {
            code,
            raw_log: parsed.raw_log.unwrap_or_default(),
            tx_hash: parsed.txhash,
        });
    }

    let Some(tx_hash) = parsed.txhash else {
        return Err(TxError::Classification { raw });
    };
    let height = match parsed.height {
        Some(h) => match h.to_u64() {
            Ok(h) => h,
            Err(_) => return Err(TxError::Classification { raw }),
        },
        None => 0,
    };

    Ok(BroadcastResult::Success {
        height,
        tx_hash,
        raw_log: parsed.raw_log.unwrap_or_default(),
    })
}
