pub mod account_query;
pub mod broadcaster;
pub mod chain_query;
mod input_guard;
pub mod message_builder;
pub mod transfer_events;
pub mod tx_hash;
pub mod tx_signer;
pub mod wallet_provider;

#[cfg(test)]
pub(crate) mod mock_ledger;

pub use account_query::{fetch_account, fetch_sequence_info, AccountInfo, SequenceInfo};
pub use broadcaster::{
    broadcast_async, broadcast_sync, sign_and_broadcast, wasm_transfer, wasm_transfer_v2,
    ChainParams,
};
pub use message_builder::{build_transfer_messages, TransferRequest};
pub use tx_hash::{compute_tx_hash, tx_hash_from_encoded};
pub use wallet_provider::wallet_for_key;
