//! HTTP 处理函数
//!
//! 只做参数提取、校验和响应包装；业务逻辑在 service 层。

use std::sync::Arc;

use axum::{
    extract::State,
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::{
        extract::{ApiJson, ApiPath, ApiQuery},
        middleware::TraceId,
        response::{success_response, ApiResult},
    },
    app_state::AppState,
    domain::{derive_wallet, BroadcastResult, Msg, StdFee, StdTx, TxError, Uint64Value},
    error::AppError,
    infrastructure::log_redact::{redact_address, redact_mnemonic},
    service::{
        self,
        chain_query::{self, Cw20Balance},
        message_builder::validate_transfer_requests,
        transfer_events::{search_transfer_events, TransferEventFilter, TransferEventPage},
        tx_signer, AccountInfo, ChainParams, SequenceInfo, TransferRequest,
    },
};

/// 把服务层错误转为带 trace_id 的 HTTP 错误
fn fail(trace: &TraceId) -> impl Fn(TxError) -> AppError + '_ {
    move |err| {
        tracing::warn!(trace_id = %trace.0, error = %err, "request_failed");
        AppError::from(err).with_trace_id(trace.0.clone())
    }
}

fn chain_params(state: &AppState) -> ChainParams<'_> {
    ChainParams {
        chain_id: state.chain_id(),
        fee_denom: state.fee_denom(),
    }
}

fn sequence_info(account_number: &Uint64Value, sequence: &Uint64Value) -> Result<SequenceInfo, TxError> {
    Ok(SequenceInfo {
        account_number: account_number.to_u64()?,
        sequence: sequence.to_u64()?,
    })
}

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: &'static str,
    pub chain_id: String,
}

/// GET /healthz
pub async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<Healthz> {
    success_response(Healthz {
        status: "ok",
        chain_id: state.chain_id().to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct NewAddressRequest {
    pub key_name: String,
    pub index: Uint64Value,
}

#[derive(Debug, Serialize)]
pub struct NewAddressResponse {
    pub address: String,
    pub hd_path: String,
}

/// POST /new-address
pub async fn new_address(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiJson(req): ApiJson<NewAddressRequest>,
) -> ApiResult<NewAddressResponse> {
    let index = req.index.to_u64().map_err(fail(&trace))?;
    let wallet = service::wallet_for_key(
        state.keystore.as_ref(),
        &req.key_name,
        index,
        state.bech32_prefix(),
    )
    .await
    .map_err(fail(&trace))?;

    tracing::info!(
        key_name = %req.key_name,
        index,
        address = %redact_address(wallet.address()),
        "address_derived"
    );

    success_response(NewAddressResponse {
        address: wallet.address().to_string(),
        hd_path: wallet.hd_path().to_string(),
    })
}

/// GET /account/:address
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath(address): ApiPath<String>,
) -> ApiResult<AccountInfo> {
    let account = service::fetch_account(state.ledger.as_ref(), &address)
        .await
        .map_err(fail(&trace))?;
    success_response(account)
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub msg: Vec<Msg>,
    #[serde(default)]
    pub memo: String,
    pub account_number: Uint64Value,
    pub sequence: Uint64Value,
}

/// POST /sign/:key_name
///
/// 用密钥的第 0 个账户离线签名（零费用），不广播
pub async fn sign_with_key(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath(key_name): ApiPath<String>,
    ApiJson(req): ApiJson<SignRequest>,
) -> ApiResult<StdTx> {
    let info = sequence_info(&req.account_number, &req.sequence).map_err(fail(&trace))?;
    let wallet = service::wallet_for_key(state.keystore.as_ref(), &key_name, 0, state.bech32_prefix())
        .await
        .map_err(fail(&trace))?;

    let tx = tx_signer::sign(
        &wallet,
        state.chain_id(),
        req.msg,
        StdFee::zero(state.fee_denom()),
        &req.memo,
        info.account_number,
        info.sequence,
    )
    .map_err(fail(&trace))?;

    tracing::info!(key_name = %key_name, sequence = info.sequence, "tx_signed_offline");
    success_response(tx)
}

#[derive(Debug, Deserialize)]
pub struct SignWithMnemonicRequest {
    pub msg: Option<Vec<Msg>>,
    pub memo: Option<String>,
    pub account_number: Uint64Value,
    pub sequence: Uint64Value,
    pub mnemonic: String,
}

#[derive(Debug, Serialize)]
pub struct SignedTxWithHash {
    pub tx: StdTx,
    pub hash: String,
}

/// POST /sign
///
/// 调用方直接提供助记词；返回签名交易和哈希
pub async fn sign_with_mnemonic(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiJson(req): ApiJson<SignWithMnemonicRequest>,
) -> ApiResult<SignedTxWithHash> {
    let Some(memo) = req.memo else {
        return Err(AppError::bad_request("memo is required").with_trace_id(trace.0.clone()));
    };
    let Some(msgs) = req.msg else {
        return Err(AppError::bad_request("msg is required").with_trace_id(trace.0.clone()));
    };

    let info = sequence_info(&req.account_number, &req.sequence).map_err(fail(&trace))?;
    tracing::debug!(mnemonic = %redact_mnemonic(&req.mnemonic), "sign_with_mnemonic");
    let wallet = derive_wallet(&req.mnemonic, 0, state.bech32_prefix()).map_err(fail(&trace))?;

    let tx = tx_signer::sign(
        &wallet,
        state.chain_id(),
        msgs,
        StdFee::zero(state.fee_denom()),
        &memo,
        info.account_number,
        info.sequence,
    )
    .map_err(fail(&trace))?;
    let hash = service::compute_tx_hash(state.ledger.as_ref(), &tx)
        .await
        .map_err(fail(&trace))?;

    success_response(SignedTxWithHash { tx, hash })
}

#[derive(Debug, Deserialize)]
pub struct GetHashRequest {
    pub tx: StdTx,
}

#[derive(Debug, Serialize)]
pub struct TxHashResponse {
    pub hash: String,
}

/// POST /get_hash
pub async fn get_hash(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiJson(req): ApiJson<GetHashRequest>,
) -> ApiResult<TxHashResponse> {
    let hash = service::compute_tx_hash(state.ledger.as_ref(), &req.tx)
        .await
        .map_err(fail(&trace))?;
    success_response(TxHashResponse { hash })
}

#[derive(Debug, Deserialize)]
pub struct WasmTransferRequest {
    pub msg: Vec<TransferRequest>,
    #[serde(default)]
    pub memo: String,
    #[serde(rename = "fromAddress")]
    pub from_address: String,
}

#[derive(Debug, Deserialize)]
pub struct WasmTransferV2Request {
    pub msg: Vec<TransferRequest>,
    #[serde(default)]
    pub memo: String,
    #[serde(rename = "fromAddress")]
    pub from_address: String,
    pub account_number: Uint64Value,
    pub sequence: Uint64Value,
}

fn check_transfers(requests: &[TransferRequest], trace: &TraceId) -> Result<(), AppError> {
    if requests.is_empty() {
        return Err(AppError::bad_request("msg must contain at least one transfer")
            .with_trace_id(trace.0.clone()));
    }
    validate_transfer_requests(requests).map_err(fail(trace))
}

fn check_sender(expected: &str, submitted: &str, index: u64, trace: &TraceId) -> Result<(), AppError> {
    if expected != submitted {
        return Err(AppError::bad_request(format!(
            "fromAddress {} does not match address {} derived at index {}",
            submitted, expected, index
        ))
        .with_trace_id(trace.0.clone()));
    }
    Ok(())
}

/// POST /wasm-transfer/:key_name/:index
pub async fn wasm_transfer(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath((key_name, index)): ApiPath<(String, u64)>,
    ApiJson(req): ApiJson<WasmTransferRequest>,
) -> ApiResult<BroadcastResult> {
    check_transfers(&req.msg, &trace)?;
    let wallet =
        service::wallet_for_key(state.keystore.as_ref(), &key_name, index, state.bech32_prefix())
            .await
            .map_err(fail(&trace))?;
    check_sender(wallet.address(), &req.from_address, index, &trace)?;

    let result = service::wasm_transfer(
        state.ledger.as_ref(),
        &wallet,
        chain_params(&state),
        &req.msg,
        &req.memo,
    )
    .await
    .map_err(fail(&trace))?;

    success_response(result)
}

/// POST /wasm-transfer-v2/:key_name/:index
pub async fn wasm_transfer_v2(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath((key_name, index)): ApiPath<(String, u64)>,
    ApiJson(req): ApiJson<WasmTransferV2Request>,
) -> ApiResult<BroadcastResult> {
    check_transfers(&req.msg, &trace)?;
    let info = sequence_info(&req.account_number, &req.sequence).map_err(fail(&trace))?;
    let wallet =
        service::wallet_for_key(state.keystore.as_ref(), &key_name, index, state.bech32_prefix())
            .await
            .map_err(fail(&trace))?;
    check_sender(wallet.address(), &req.from_address, index, &trace)?;

    let result = service::wasm_transfer_v2(
        state.ledger.as_ref(),
        &wallet,
        chain_params(&state),
        &req.msg,
        &req.memo,
        info,
    )
    .await
    .map_err(fail(&trace))?;

    success_response(result)
}

#[derive(Debug, Deserialize)]
pub struct SignAndBroadcastRequest {
    pub msg: Vec<Msg>,
    #[serde(default)]
    pub memo: String,
}

/// POST /sign-and-broadcast/:key_name
pub async fn sign_and_broadcast(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath(key_name): ApiPath<String>,
    ApiJson(req): ApiJson<SignAndBroadcastRequest>,
) -> ApiResult<BroadcastResult> {
    let wallet = service::wallet_for_key(state.keystore.as_ref(), &key_name, 0, state.bech32_prefix())
        .await
        .map_err(fail(&trace))?;

    let result = service::sign_and_broadcast(
        state.ledger.as_ref(),
        &wallet,
        chain_params(&state),
        req.msg,
        &req.memo,
    )
    .await
    .map_err(fail(&trace))?;

    success_response(result)
}

/// GET /wasm-balance/:contract/:address
pub async fn wasm_balance(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath((contract, address)): ApiPath<(String, String)>,
) -> ApiResult<Cw20Balance> {
    let balance = chain_query::query_cw20_balance(state.ledger.as_ref(), &contract, &address)
        .await
        .map_err(fail(&trace))?;
    success_response(balance)
}

/// GET /txs/:hash
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath(hash): ApiPath<String>,
) -> ApiResult<Value> {
    let tx = chain_query::get_transaction(state.ledger.as_ref(), &hash)
        .await
        .map_err(fail(&trace))?;
    success_response(tx)
}

/// GET /blocks/:height
pub async fn get_block_txs(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiPath(height): ApiPath<u64>,
) -> ApiResult<Vec<String>> {
    let txs = chain_query::get_block_txs(state.ledger.as_ref(), height)
        .await
        .map_err(fail(&trace))?;
    success_response(txs)
}

/// GET /wasm-transfer-event
pub async fn wasm_transfer_events(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceId>,
    ApiQuery(filter): ApiQuery<TransferEventFilter>,
) -> ApiResult<TransferEventPage> {
    let page = search_transfer_events(state.ledger.as_ref(), &filter)
        .await
        .map_err(fail(&trace))?;
    success_response(page)
}
