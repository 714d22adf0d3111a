//! 转账请求 => 合约执行消息

use serde::{Deserialize, Serialize};

use crate::domain::{ContractMsg, Cw20ExecuteMsg, Msg, MsgExecuteContract, TxError, TxResult};

/// 一笔 cw20 转账
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub token_address: String,
    pub to_address: String,
    /// 十进制非负整数
    pub amount: String,
}

/// 每个请求对应一条消息，顺序与输入一致；不附带原生代币
pub fn build_transfer_messages(requests: &[TransferRequest], sender: &str) -> Vec<Msg> {
    requests
        .iter()
        .map(|req| {
            Msg::ExecuteContract(MsgExecuteContract {
                sender: sender.to_string(),
                contract: req.token_address.clone(),
                msg: ContractMsg::Cw20(Cw20ExecuteMsg::Transfer {
                    recipient: req.to_address.clone(),
                    amount: req.amount.clone(),
                }),
                sent_funds: Vec::new(),
            })
        })
        .collect()
}

/// HTTP 入口处的参数校验
pub fn validate_transfer_requests(requests: &[TransferRequest]) -> TxResult<()> {
    for (i, req) in requests.iter().enumerate() {
        if req.token_address.trim().is_empty() || req.to_address.trim().is_empty() {
            return Err(TxError::InvalidInput(format!(
                "transfer #{} is missing tokenAddress or toAddress",
                i
            )));
        }
        if req.amount.is_empty() || !req.amount.chars().all(|c| c.is_ascii_digit()) {
            return Err(TxError::InvalidInput(format!(
                "transfer #{} amount {:?} is not a non-negative integer",
                i, req.amount
            )));
        }
    }
    Ok(())
}
