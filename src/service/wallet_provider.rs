//! 按密钥名解析助记词并派生钱包
//!
//! 每个请求派生一次，不缓存。

use crate::{
    domain::{derive_wallet, Secp256k1HdWallet, TxResult},
    infrastructure::KeyStore,
};

pub async fn wallet_for_key(
    keystore: &dyn KeyStore,
    key_name: &str,
    account_index: u64,
    prefix: &str,
) -> TxResult<Secp256k1HdWallet> {
    let mnemonic = keystore.lookup(key_name).await?;
    let wallet = derive_wallet(&mnemonic, account_index, prefix)?;

    tracing::debug!(key_name = %key_name, hd_path = %wallet.hd_path(), "wallet_derived");
    Ok(wallet)
}
