//! Cosmos HD 钱包
//!
//! 从助记词派生 secp256k1 密钥，路径 m/44'/118'/0'/0/{index}。
//! 账户索引参与密钥派生本身，而不是在派生结果里挑选账户。

use std::fmt;

use base64::Engine;
use bip39::{Language, Mnemonic};
use bitcoin::hashes::{hash160, Hash};
use coins_bip32::{path::DerivationPath, prelude::*};
use k256::ecdsa::{signature::Signer, Signature, SigningKey};
use zeroize::Zeroizing;

use crate::domain::{
    amino::{serialize_sign_doc, PubKey, StdSignDoc, StdSignature, SECP256K1_PUBKEY_TYPE},
    errors::{TxError, TxResult},
};

/// Cosmos Hub 派生路径前缀（coin type 118）
pub const COSMOS_HD_PATH_PREFIX: &str = "m/44'/118'/0'/0/";
/// 最后一级为非硬化索引
pub const MAX_ACCOUNT_INDEX: u64 = 0x7FFF_FFFF;

pub fn cosmos_hd_path(index: u32) -> String {
    format!("{}{}", COSMOS_HD_PATH_PREFIX, index)
}

/// 钱包公开的账户信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub address: String,
    pub algo: &'static str,
    /// 压缩公钥（33 字节）
    pub pubkey: Vec<u8>,
}

/// 签名后端返回值
#[derive(Debug, Clone)]
pub struct AminoSignResponse {
    pub signed: StdSignDoc,
    pub signature: StdSignature,
}

/// 签名后端 trait
///
/// 给定地址和签名文档，返回签名后的文档和签名。
pub trait OfflineSigner: Send + Sync {
    /// 账户列表，至少一个；第一个为规范签名身份
    fn accounts(&self) -> &[AccountData];

    fn sign_amino(&self, signer_address: &str, sign_doc: StdSignDoc)
        -> TxResult<AminoSignResponse>;
}

/// 基于 BIP39/BIP32 的本地 secp256k1 钱包
pub struct Secp256k1HdWallet {
    signing_key: SigningKey,
    accounts: Vec<AccountData>,
    hd_path: String,
}

impl fmt::Debug for Secp256k1HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1HdWallet")
            .field("accounts", &self.accounts)
            .field("hd_path", &self.hd_path)
            .finish_non_exhaustive()
    }
}

/// 从助记词和账户索引派生钱包
pub fn derive_wallet(
    mnemonic: &str,
    account_index: u64,
    prefix: &str,
) -> TxResult<Secp256k1HdWallet> {
    Secp256k1HdWallet::from_mnemonic(mnemonic, account_index, prefix)
}

impl Secp256k1HdWallet {
    pub fn from_mnemonic(mnemonic: &str, account_index: u64, prefix: &str) -> TxResult<Self> {
        if account_index > MAX_ACCOUNT_INDEX {
            return Err(TxError::IndexOutOfRange(account_index));
        }
        let index = account_index as u32;

        let parsed = Mnemonic::parse_in(Language::English, mnemonic.trim())
            .map_err(|e| TxError::InvalidMnemonic(e.to_string()))?;
        let seed = Zeroizing::new(parsed.to_seed(""));

        let hd_path = cosmos_hd_path(index);
        let derivation_path = hd_path
            .parse::<DerivationPath>()
            .map_err(|e| TxError::InvalidInput(format!("invalid derivation path: {}", e)))?;

        let master_key = XPriv::root_from_seed(&seed[..], None)
            .map_err(|e| TxError::InvalidMnemonic(format!("failed to derive master key: {}", e)))?;
        let derived_key = master_key
            .derive_path(&derivation_path)
            .map_err(|e| TxError::InvalidMnemonic(format!("failed to derive key: {}", e)))?;

        // XPriv 实现 AsRef<SigningKey>
        let signing_key: &SigningKey = derived_key.as_ref();
        let signing_key = signing_key.clone();

        let pubkey = signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        let address = pubkey_to_address(&pubkey, prefix)?;

        Ok(Self {
            signing_key,
            accounts: vec![AccountData {
                address,
                algo: "secp256k1",
                pubkey,
            }],
            hd_path,
        })
    }

    /// 规范签名地址
    pub fn address(&self) -> &str {
        &self.accounts[0].address
    }

    pub fn hd_path(&self) -> &str {
        &self.hd_path
    }
}

impl OfflineSigner for Secp256k1HdWallet {
    fn accounts(&self) -> &[AccountData] {
        &self.accounts
    }

    fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> TxResult<AminoSignResponse> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.address == signer_address)
            .ok_or_else(|| {
                TxError::Signing(format!("address {} not found in wallet", signer_address))
            })?;

        let message = serialize_sign_doc(&sign_doc)?;
        let signature: Signature = self
            .signing_key
            .try_sign(&message)
            .map_err(|e| TxError::Signing(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        Ok(AminoSignResponse {
            signed: sign_doc,
            signature: encode_secp256k1_signature(&account.pubkey, &signature),
        })
    }
}

/// bech32(prefix, RIPEMD160(SHA256(pubkey)))
pub fn pubkey_to_address(pubkey: &[u8], prefix: &str) -> TxResult<String> {
    let digest = hash160::Hash::hash(pubkey);
    let hrp = bech32::Hrp::parse(prefix)
        .map_err(|e| TxError::InvalidInput(format!("invalid bech32 prefix {}: {}", prefix, e)))?;
    bech32::encode::<bech32::Bech32>(hrp, digest.as_byte_array())
        .map_err(|e| TxError::InvalidInput(format!("bech32 encoding failed: {}", e)))
}

pub fn encode_secp256k1_signature(pubkey: &[u8], signature: &Signature) -> StdSignature {
    let engine = base64::engine::general_purpose::STANDARD;
    StdSignature {
        pub_key: PubKey {
            key_type: SECP256K1_PUBKEY_TYPE.to_string(),
            value: engine.encode(pubkey),
        },
        signature: engine.encode(signature.to_bytes().as_slice()),
    }
}
