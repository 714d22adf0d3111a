pub mod keystore;
pub mod lcd_client;
pub mod log_redact;
pub mod logging;

pub use keystore::{FileKeyStore, KeyStore};
pub use lcd_client::{LcdClient, LedgerClient, LedgerError};
