use crate::{Amount, PublicKey, TransactionOutput, Utxo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::FromIterator;

/// A pool of confirmed and unspent transaction outputs.
/// Cloning a pool produces an independent copy; mutating one doesn't affect the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "UtxoPoolSnapshot", into = "UtxoPoolSnapshot")]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction hash and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Returns the output for the given UTXO, or None if the output is spent or never existed.
    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// Adds the mapping from the UTXO to the output, overwriting any existing mapping.
    pub fn add_utxo(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the UTXO from the pool and returns its output, if it was present.
    pub fn remove_utxo(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    /// Returns all UTXOs in the pool in no particular order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        self.utxos.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of all unspent values in the pool.
    pub fn total_value(&self) -> Amount {
        self.utxos.values().map(TransactionOutput::value).sum()
    }

    /// Sum of the unspent values owned by the given public key.
    pub fn balance(&self, public_key: &PublicKey) -> Amount {
        self.utxos
            .values()
            .filter(|output| output.recipient() == public_key)
            .map(TransactionOutput::value)
            .sum()
    }
}

impl FromIterator<(Utxo, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct UtxoPoolEntry {
    utxo: Utxo,
    output: TransactionOutput,
}

/// The serialized form of the pool: a list of entries sorted by UTXO.
/// A map keyed by UTXO can't be written as a JSON object, and sorting keeps the files stable.
#[derive(Serialize, Deserialize)]
struct UtxoPoolSnapshot {
    utxos: Vec<UtxoPoolEntry>,
}

impl From<UtxoPoolSnapshot> for UtxoPool {
    fn from(snapshot: UtxoPoolSnapshot) -> Self {
        snapshot
            .utxos
            .into_iter()
            .map(|entry| (entry.utxo, entry.output))
            .collect()
    }
}

impl From<UtxoPool> for UtxoPoolSnapshot {
    fn from(pool: UtxoPool) -> Self {
        let mut utxos = pool
            .utxos
            .into_iter()
            .map(|(utxo, output)| UtxoPoolEntry { utxo, output })
            .collect::<Vec<UtxoPoolEntry>>();
        utxos.sort_by(|lhs, rhs| lhs.utxo.cmp(&rhs.utxo));
        Self { utxos }
    }
}
