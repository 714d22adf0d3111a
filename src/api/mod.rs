use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;

use self::middleware::trace_id_middleware;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        // 地址与账户
        .route("/new-address", post(handlers::new_address))
        .route("/account/:address", get(handlers::get_account))
        // 离线签名与哈希
        .route("/sign", post(handlers::sign_with_mnemonic))
        .route("/sign/:key_name", post(handlers::sign_with_key))
        .route("/get_hash", post(handlers::get_hash))
        // 签名并广播
        .route(
            "/wasm-transfer/:key_name/:index",
            post(handlers::wasm_transfer),
        )
        .route(
            "/wasm-transfer-v2/:key_name/:index",
            post(handlers::wasm_transfer_v2),
        )
        .route(
            "/sign-and-broadcast/:key_name",
            post(handlers::sign_and_broadcast),
        )
        // 只读查询
        .route(
            "/wasm-balance/:contract/:address",
            get(handlers::wasm_balance),
        )
        .route("/txs/:hash", get(handlers::get_transaction))
        .route("/blocks/:height", get(handlers::get_block_txs))
        .route("/wasm-transfer-event", get(handlers::wasm_transfer_events))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(from_fn(trace_id_middleware)),
        )
        .with_state(state)
}
