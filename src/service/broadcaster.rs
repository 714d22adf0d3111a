//! 交易广播
//!
//! - `broadcast_sync`: block 模式，等待区块包含
//! - `broadcast_async`: async 模式，进入内存池即返回（Success 只表示已接受）
//!
//! 传输层故障被转换为 `BroadcastResult::TransportError`，调用方总能拿到一个值。
//! 不做任何重试；sequence 冲突表现为普通的 Failure。

use serde_json::json;

use crate::{
    domain::{
        classify_broadcast_response, BroadcastMode, BroadcastResult, Msg, OfflineSigner, StdFee,
        StdTx, TxError, TxResult,
    },
    infrastructure::{log_redact::redact_address, LedgerClient, LedgerError},
    service::{
        account_query::{fetch_sequence_info, SequenceInfo},
        message_builder::{build_transfer_messages, TransferRequest},
        tx_signer,
    },
};

/// 签名所需的链参数
#[derive(Debug, Clone, Copy)]
pub struct ChainParams<'a> {
    pub chain_id: &'a str,
    pub fee_denom: &'a str,
}

pub async fn broadcast_sync(ledger: &dyn LedgerClient, tx: &StdTx) -> TxResult<BroadcastResult> {
    broadcast(ledger, tx, BroadcastMode::Block).await
}

pub async fn broadcast_async(ledger: &dyn LedgerClient, tx: &StdTx) -> TxResult<BroadcastResult> {
    broadcast(ledger, tx, BroadcastMode::Async).await
}

async fn broadcast(
    ledger: &dyn LedgerClient,
    tx: &StdTx,
    mode: BroadcastMode,
) -> TxResult<BroadcastResult> {
    let result = match ledger.broadcast_tx(tx, mode).await {
        Ok(raw) => classify_broadcast_response(raw)?,
        Err(LedgerError::Transport(message)) => {
            tracing::warn!(mode = mode.as_str(), error = %message, "broadcast_transport_error");
            BroadcastResult::TransportError { message }
        }
        Err(LedgerError::Status { status, body }) => {
            return Err(TxError::Classification {
                raw: json!({ "status": status, "body": body }),
            });
        }
        Err(LedgerError::Decode(message)) => {
            return Err(TxError::Classification {
                raw: json!({ "decode_error": message }),
            });
        }
    };

    match &result {
        BroadcastResult::Success { height, tx_hash, .. } => {
            tracing::info!(mode = mode.as_str(), height, tx_hash = %tx_hash, "tx_broadcast_accepted");
        }
        BroadcastResult::Failure { code, raw_log, .. } => {
            tracing::warn!(mode = mode.as_str(), code, raw_log = %raw_log, "tx_broadcast_rejected");
        }
        BroadcastResult::TransportError { .. } => {}
    }

    Ok(result)
}

fn primary_address(signer: &dyn OfflineSigner) -> TxResult<String> {
    signer
        .accounts()
        .first()
        .map(|a| a.address.clone())
        .ok_or_else(|| TxError::Signing("wallet exposes no accounts".to_string()))
}

/// 直接广播：拉取账户信息，非零费用签名，block 模式广播
pub async fn sign_and_broadcast(
    ledger: &dyn LedgerClient,
    signer: &dyn OfflineSigner,
    params: ChainParams<'_>,
    msgs: Vec<Msg>,
    memo: &str,
) -> TxResult<BroadcastResult> {
    let sender = primary_address(signer)?;
    let info = fetch_sequence_info(ledger, &sender).await?;

    let tx = tx_signer::sign(
        signer,
        params.chain_id,
        msgs,
        StdFee::direct_broadcast(params.fee_denom),
        memo,
        info.account_number,
        info.sequence,
    )?;
    broadcast_sync(ledger, &tx).await
}

/// cw20 转账（集成路径）：拉取账户信息，零费用签名，async 模式广播
pub async fn wasm_transfer(
    ledger: &dyn LedgerClient,
    signer: &dyn OfflineSigner,
    params: ChainParams<'_>,
    requests: &[TransferRequest],
    memo: &str,
) -> TxResult<BroadcastResult> {
    let sender = primary_address(signer)?;
    let info = fetch_sequence_info(ledger, &sender).await?;
    transfer_with_sequence(ledger, signer, params, &sender, requests, memo, info).await
}

/// cw20 转账（手动路径）：调用方提供 account_number / sequence
pub async fn wasm_transfer_v2(
    ledger: &dyn LedgerClient,
    signer: &dyn OfflineSigner,
    params: ChainParams<'_>,
    requests: &[TransferRequest],
    memo: &str,
    info: SequenceInfo,
) -> TxResult<BroadcastResult> {
    let sender = primary_address(signer)?;
    transfer_with_sequence(ledger, signer, params, &sender, requests, memo, info).await
}

async fn transfer_with_sequence(
    ledger: &dyn LedgerClient,
    signer: &dyn OfflineSigner,
    params: ChainParams<'_>,
    sender: &str,
    requests: &[TransferRequest],
    memo: &str,
    info: SequenceInfo,
) -> TxResult<BroadcastResult> {
    tracing::info!(
        sender = %redact_address(sender),
        transfers = requests.len(),
        sequence = info.sequence,
        "wasm_transfer"
    );

    let msgs = build_transfer_messages(requests, sender);
    let tx = tx_signer::sign(
        signer,
        params.chain_id,
        msgs,
        StdFee::zero(params.fee_denom),
        memo,
        info.account_number,
        info.sequence,
    )?;
    broadcast_async(ledger, &tx).await
}
