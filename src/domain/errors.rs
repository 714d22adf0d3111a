//! 交易流水线错误分类
//!
//! 每个核心操作都返回带类型的结果，区分自身的终止错误和传输层故障

use thiserror::Error;

/// 签名/广播流水线错误
#[derive(Debug, Error)]
pub enum TxError {
    /// 助记词无法解码为密钥材料
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// 账户索引超出非硬化派生范围
    #[error("account index {0} is outside the supported derivation range")]
    IndexOutOfRange(u64),

    /// 签名后端无法产生签名（不重试）
    #[error("signing failed: {0}")]
    Signing(String),

    /// 节点编码接口不可用
    #[error("transaction encoding unavailable: {0}")]
    EncodingUnavailable(String),

    /// 广播响应既不是成功也不是失败形态，保留原始响应
    #[error("unrecognized broadcast response: {raw}")]
    Classification { raw: serde_json::Value },

    /// 地址在链上没有账户记录
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// 查询对象（交易、区块）不存在
    #[error("not found: {0}")]
    NotFound(String),

    /// 密钥名不存在
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// 密钥文件存在但内容不可用
    #[error("key store error: {0}")]
    KeyStore(String),

    /// 调用方提供的参数不合法
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 网络层故障
    #[error("transport error: {0}")]
    Transport(String),

    /// 节点返回了无法解析的查询响应
    #[error("unexpected node response: {0}")]
    InvalidResponse(String),
}

pub type TxResult<T> = Result<T, TxError>;
