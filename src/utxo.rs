use crate::TransactionHash;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifies a single spendable output: the hash of the transaction that created it and its
/// position among that transaction's outputs.
/// Ordering is by hash first, then by index.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Utxo {
    tx_hash: TransactionHash,
    index: u32,
}

impl Utxo {
    pub fn new(tx_hash: TransactionHash, index: u32) -> Self {
        Self { tx_hash, index }
    }

    pub fn tx_hash(&self) -> &TransactionHash {
        &self.tx_hash
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}
