//! 交易签名
//!
//! 组装签名文档，用钱包的第一个账户签名，封装为 StdTx。
//! 费用档位由调用方选择。

use crate::domain::{
    make_sign_doc, make_std_tx, Msg, OfflineSigner, StdFee, StdTx, TxError, TxResult,
};

pub fn sign(
    signer: &dyn OfflineSigner,
    chain_id: &str,
    msgs: Vec<Msg>,
    fee: StdFee,
    memo: &str,
    account_number: u64,
    sequence: u64,
) -> TxResult<StdTx> {
    let address = signer
        .accounts()
        .first()
        .map(|a| a.address.clone())
        .ok_or_else(|| TxError::Signing("wallet exposes no accounts".to_string()))?;

    let sign_doc = make_sign_doc(msgs, fee, chain_id, memo, account_number, sequence);
    let response = signer.sign_amino(&address, sign_doc)?;

    tracing::debug!(
        account_number,
        sequence,
        msg_count = response.signed.msgs.len(),
        "tx_signed"
    );

    Ok(make_std_tx(response.signed, response.signature))
}
