//! cosmwasm-signer - CosmWasm 链签名与广播服务
//!
//! 从助记词派生钱包，构造并签名 Amino JSON 交易，计算哈希并提交到 LCD 节点

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{AppError, AppErrorCode};
