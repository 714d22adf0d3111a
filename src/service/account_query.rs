//! 账户查询
//!
//! 返回签名所需的 account_number / sequence。不做缓存，
//! 连续签名时调用方需要在每次成功广播后重新获取。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Coin, TxError, TxResult, Uint64Value},
    infrastructure::{log_redact::redact_address, LedgerClient},
};

use super::input_guard::check_bech32_value;

/// 签名输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// 链上账户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
    pub coins: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    result: Option<AccountResult>,
}

#[derive(Debug, Deserialize)]
struct AccountResult {
    value: Option<AccountValue>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    #[serde(default)]
    address: String,
    #[serde(default)]
    account_number: Option<Uint64Value>,
    #[serde(default)]
    sequence: Option<Uint64Value>,
    #[serde(default)]
    coins: Option<Vec<Coin>>,
}

fn parse_u64(value: Option<Uint64Value>, field: &str) -> TxResult<u64> {
    match value {
        None => Ok(0),
        Some(v) => v
            .to_u64()
            .map_err(|_| TxError::InvalidResponse(format!("account {} is not an integer", field))),
    }
}

fn parse_account(address: &str, raw: Value) -> TxResult<AccountInfo> {
    let response: AccountResponse = serde_json::from_value(raw)
        .map_err(|e| TxError::InvalidResponse(format!("malformed account response: {}", e)))?;

    // 未激活的地址：节点返回空地址的零值账户
    let value = response
        .result
        .and_then(|r| r.value)
        .filter(|v| !v.address.is_empty())
        .ok_or_else(|| TxError::AccountNotFound(address.to_string()))?;

    Ok(AccountInfo {
        address: value.address,
        account_number: parse_u64(value.account_number, "account_number")?,
        sequence: parse_u64(value.sequence, "sequence")?,
        coins: value.coins.unwrap_or_default(),
    })
}

pub async fn fetch_account(ledger: &dyn LedgerClient, address: &str) -> TxResult<AccountInfo> {
    check_bech32_value("address", address)?;

    let raw = match ledger.account(address).await {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => return Err(TxError::AccountNotFound(address.to_string())),
        Err(e) => return Err(e.into()),
    };

    let account = parse_account(address, raw)?;
    tracing::debug!(
        address = %redact_address(address),
        account_number = account.account_number,
        sequence = account.sequence,
        "account_fetched"
    );
    Ok(account)
}

pub async fn fetch_sequence_info(
    ledger: &dyn LedgerClient,
    address: &str,
) -> TxResult<SequenceInfo> {
    let account = fetch_account(ledger, address).await?;
    Ok(SequenceInfo {
        account_number: account.account_number,
        sequence: account.sequence,
    })
}
