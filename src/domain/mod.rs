//! Domain 模块
//!
//! 交易结构、钱包派生、广播结果分类和错误类型，不做任何 I/O

pub mod amino;
pub mod broadcast_result;
pub mod errors;
pub mod wallet;

// 重新导出常用类型
pub use amino::{
    canonical_json, make_sign_doc, make_std_tx, serialize_sign_doc, Coin, ContractMsg,
    Cw20ExecuteMsg, Msg, MsgExecuteContract, MsgSend, StdFee, StdSignDoc, StdSignature, StdTx,
    Uint64Value, WrappedStdTx,
};
pub use broadcast_result::{classify_broadcast_response, BroadcastMode, BroadcastResult};
pub use errors::{TxError, TxResult};
pub use wallet::{derive_wallet, AccountData, AminoSignResponse, OfflineSigner, Secp256k1HdWallet};
