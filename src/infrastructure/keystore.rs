//! 助记词存储
//!
//! 按名字查找助记词，文件格式：`{keys_dir}/{name}.json` => `{"mnemonic": "..."}`

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{TxError, TxResult};

/// 密钥查找契约
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn lookup(&self, name: &str) -> TxResult<Zeroizing<String>>;
}

#[derive(Deserialize)]
struct KeyFile {
    mnemonic: String,
}

pub struct FileKeyStore {
    keys_dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(keys_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys_dir: keys_dir.into(),
        }
    }
}

/// 只允许字母数字、`-`、`_`，防止路径穿越
fn is_valid_key_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn lookup(&self, name: &str) -> TxResult<Zeroizing<String>> {
        if !is_valid_key_name(name) {
            return Err(TxError::KeyNotFound(name.to_string()));
        }

        let path = self.keys_dir.join(format!("{}.json", name));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => Zeroizing::new(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TxError::KeyNotFound(name.to_string()));
            }
            Err(e) => {
                return Err(TxError::KeyStore(format!(
                    "failed to read key file {}: {}",
                    name, e
                )));
            }
        };

        let key: KeyFile = serde_json::from_str(&content)
            .map_err(|e| TxError::KeyStore(format!("malformed key file {}: {}", name, e)))?;

        Ok(Zeroizing::new(key.mnemonic))
    }
}
