//! 拼进节点 URL 的调用方输入校验
//!
//! 路径参数经 axum 解码后可能带 `/`、`?`、`..`，原样拼接会访问到节点的其他接口。

use crate::domain::{TxError, TxResult};

/// 地址、合约地址：只允许 bech32 字符
pub(crate) fn check_bech32_value(name: &str, value: &str) -> TxResult<()> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TxError::InvalidInput(format!("invalid {}: {:?}", name, value)));
    }
    Ok(())
}

/// 交易哈希：十六进制
pub(crate) fn check_tx_hash(hash: &str) -> TxResult<()> {
    if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TxError::InvalidInput(format!("invalid tx hash: {:?}", hash)));
    }
    Ok(())
}
