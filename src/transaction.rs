use crate::{Amount, PublicKey, Sha256, Utxo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the finalized transaction data.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct TransactionHash(Sha256);

impl TransactionHash {
    pub const fn new(hash: Sha256) -> Self {
        Self(hash)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Display for TransactionHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Hashes are written as hex strings so that pool and batch files stay readable.
impl Serialize for TransactionHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Sha256::from_hex(&s)
            .map(TransactionHash)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // A pointer to the transaction containing the UTXO to be spent.
    prev_tx_hash: TransactionHash,
    // The number of the UTXO to be spent, the first one is 0.
    output_index: u32,
    // Signature over `Transaction::raw_data_to_sign` for this input, produced by the owner of
    // the referenced output. Absent until the input is signed.
    signature: Option<Vec<u8>>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.prev_tx_hash, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(prev_tx_hash: TransactionHash, output_index: u32) -> Self {
        Self {
            prev_tx_hash,
            output_index,
            signature: None,
        }
    }

    pub fn prev_tx_hash(&self) -> &TransactionHash {
        &self.prev_tx_hash
    }

    pub fn output_index(&self) -> u32 {
        self.output_index
    }

    /// The output this input spends.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.prev_tx_hash, self.output_index)
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    recipient: PublicKey,
    value: Amount,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value, self.recipient)
    }
}

impl TransactionOutput {
    pub fn new(recipient: PublicKey, value: Amount) -> Self {
        Self { recipient, value }
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }

    pub fn value(&self) -> Amount {
        self.value
    }
}

// The part of the transaction that the owner of the spent output commits to.
// Signatures are excluded, so each input can be signed independently.
#[derive(Serialize)]
struct SignableInput<'a> {
    prev_tx_hash: &'a TransactionHash,
    output_index: u32,
    outputs: &'a [TransactionOutput],
}

// Encodes transaction data with bincode.
// Every encoded type is made of fixed-size fields, byte vectors and sequences of known length,
// and the target is an in-memory buffer, so the encoding can't fail.
fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    bincode::serialize(value).expect("transaction data is always encodable")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    // Set by `finalize`. Outputs are addressable only once the hash is fixed.
    #[serde(default)]
    hash: Option<TransactionHash>,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self {
            hash: None,
            inputs,
            outputs,
        }
    }

    pub fn add_input(&mut self, prev_tx_hash: TransactionHash, output_index: u32) {
        self.inputs.push(TransactionInput::new(prev_tx_hash, output_index));
    }

    pub fn add_output(&mut self, recipient: PublicKey, value: Amount) {
        self.outputs.push(TransactionOutput::new(recipient, value));
    }

    /// Attaches the signature to the input at the given index.
    /// Returns an error if the input doesn't exist.
    pub fn add_signature(&mut self, signature: Vec<u8>, index: usize) -> Result<(), String> {
        let inputs_len = self.inputs.len();
        match self.inputs.get_mut(index) {
            Some(input) => {
                input.signature = Some(signature);
                Ok(())
            }
            None => Err(format!(
                "Input index: {} is out of bounds for a transaction with {} inputs",
                index, inputs_len
            )),
        }
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// Returns the bytes the owner of the output spent by input `index` signs.
    /// The payload covers the spent output reference and all the outputs of this transaction.
    /// Returns None if there is no input at the given index.
    pub fn raw_data_to_sign(&self, index: usize) -> Option<Vec<u8>> {
        let input = self.inputs.get(index)?;
        Some(encode(&SignableInput {
            prev_tx_hash: &input.prev_tx_hash,
            output_index: input.output_index,
            outputs: &self.outputs,
        }))
    }

    /// The complete transaction data, including signatures. This is what the hash covers.
    pub fn raw_tx(&self) -> Vec<u8> {
        encode(&(&self.inputs, &self.outputs))
    }

    /// Fixes the hash of the transaction over its current contents.
    /// Calling it again after a modification recomputes the hash.
    pub fn finalize(&mut self) -> TransactionHash {
        let hash = TransactionHash(Sha256::double_digest(&self.raw_tx()));
        self.hash = Some(hash);
        hash
    }

    /// Returns the hash of the transaction, or None if it hasn't been finalized.
    pub fn hash(&self) -> Option<&TransactionHash> {
        self.hash.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(byte: u8) -> PublicKey {
        PublicKey::new(vec![byte; 33])
    }

    fn sample_transaction() -> Transaction {
        let mut transaction = Transaction::new(vec![], vec![]);
        transaction.add_input(TransactionHash::new(Sha256::digest(b"genesis")), 0);
        transaction.add_input(TransactionHash::new(Sha256::digest(b"genesis")), 1);
        transaction.add_output(recipient(1), Amount::from(7));
        transaction.add_output(recipient(2), Amount::from(3));
        transaction
    }

    #[test]
    fn new_transaction_is_not_finalized() {
        let transaction = sample_transaction();
        assert!(!transaction.is_finalized());
        assert_eq!(transaction.hash(), None);
    }

    #[test]
    fn finalize_is_deterministic() {
        let mut lhs = sample_transaction();
        let mut rhs = sample_transaction();
        assert_eq!(lhs.finalize(), rhs.finalize());
        assert_eq!(lhs.hash(), rhs.hash());
    }

    #[test]
    fn finalize_stores_double_digest_of_raw_tx() {
        let mut transaction = sample_transaction();
        let expected = Sha256::double_digest(&transaction.raw_tx());
        let hash = transaction.finalize();
        assert_eq!(hash.as_slice(), expected.as_slice());
        assert_eq!(transaction.hash(), Some(&hash));
        assert!(transaction.is_finalized());
    }

    #[test]
    fn hash_covers_signatures() {
        let mut unsigned = sample_transaction();
        let mut signed = sample_transaction();
        signed.add_signature(vec![1, 2, 3], 0).unwrap();
        assert_ne!(unsigned.finalize(), signed.finalize());
    }

    #[test]
    fn signable_payload_excludes_signatures() {
        let unsigned = sample_transaction();
        let mut signed = sample_transaction();
        signed.add_signature(vec![1, 2, 3], 0).unwrap();
        signed.add_signature(vec![4, 5, 6], 1).unwrap();
        assert_eq!(unsigned.raw_data_to_sign(0), signed.raw_data_to_sign(0));
        assert_eq!(unsigned.raw_data_to_sign(1), signed.raw_data_to_sign(1));
    }

    #[test]
    fn signable_payload_differs_per_input() {
        let transaction = sample_transaction();
        assert_ne!(
            transaction.raw_data_to_sign(0),
            transaction.raw_data_to_sign(1)
        );
    }

    #[test]
    fn signable_payload_covers_outputs() {
        let transaction = sample_transaction();
        let mut modified = sample_transaction();
        modified.add_output(recipient(3), Amount::from(1));
        assert_ne!(
            transaction.raw_data_to_sign(0),
            modified.raw_data_to_sign(0)
        );
    }

    #[test]
    fn signable_payload_out_of_range() {
        assert_eq!(sample_transaction().raw_data_to_sign(2), None);
    }

    #[test]
    fn add_signature_out_of_range() {
        let mut transaction = sample_transaction();
        assert!(transaction.add_signature(vec![0], 5).is_err());
    }

    #[test]
    fn input_references_utxo() {
        let transaction = sample_transaction();
        let input = &transaction.inputs()[1];
        assert_eq!(input.utxo(), Utxo::new(*input.prev_tx_hash(), 1));
        assert_eq!(input.signature(), None);
    }

    #[test]
    fn json_uses_hex_hashes() {
        let mut transaction = sample_transaction();
        let hash = transaction.finalize();
        let json = serde_json::to_string(&transaction).unwrap();
        assert!(json.contains(&hash.to_string()));
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, transaction);
    }
}
