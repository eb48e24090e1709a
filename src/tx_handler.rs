use crate::{
    Amount, EcdsaVerifier, SignatureVerifier, Transaction, TransactionHash, TransactionInput,
    TransactionOutput, Utxo, UtxoPool,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::TryFrom;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The reason a transaction is not accepted.
/// A rejection is an ordinary outcome of validation, not a failure of the handler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxRejection {
    #[error("Input {input_index} spends {utxo} which is not in the UTXO pool")]
    MissingUtxo { input_index: usize, utxo: Utxo },

    #[error("Input {input_index} spending {utxo} is not signed by the owner of the output")]
    InvalidSignature { input_index: usize, utxo: Utxo },

    #[error("Input {input_index} claims {utxo} which is already claimed by this transaction")]
    DoubleClaim { input_index: usize, utxo: Utxo },

    #[error("Output {output_index} has a negative value: {value}")]
    NegativeOutput { output_index: usize, value: Amount },

    #[error("Inputs worth {inputs} do not cover outputs worth {outputs}")]
    InsufficientInputs { inputs: Amount, outputs: Amount },

    #[error("Output {output_index} can't be addressed by a 32-bit output index")]
    UnaddressableOutput { output_index: usize },
}

/// What happens to the rest of a batch after a transaction is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// No later transaction in the batch is evaluated.
    StopAtFirstRejection,
    /// Later transactions are evaluated against the pool reached so far.
    SkipRejected,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        BatchPolicy::StopAtFirstRejection
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub policy: BatchPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedTransaction {
    // Position of the transaction in the proposed batch.
    pub index: usize,
    pub transaction: Transaction,
    pub reason: TxRejection,
}

/// Outcome of settling a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settlement {
    /// Finalized transactions applied to the pool, in the order they were accepted.
    pub accepted: Vec<Transaction>,
    pub rejected: Vec<RejectedTransaction>,
    /// Transactions that were never evaluated because the batch was cut short.
    pub unprocessed: Vec<Transaction>,
}

/// Validates transactions against its own copy of the UTXO pool and settles batches of
/// transactions, updating the pool as they are accepted.
///
/// The handler is not synchronized. Callers that settle concurrently must give each context
/// its own handler, each seeded from its own copy of the pool.
pub struct TxHandler<V: SignatureVerifier = EcdsaVerifier> {
    utxo_pool: UtxoPool,
    verifier: V,
    config: HandlerConfig,
}

impl TxHandler<EcdsaVerifier> {
    /// Creates a ledger whose current pool is a copy of the given pool.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self::with_verifier(utxo_pool, EcdsaVerifier, HandlerConfig::default())
    }
}

impl<V: SignatureVerifier> TxHandler<V> {
    pub fn with_verifier(utxo_pool: &UtxoPool, verifier: V, config: HandlerConfig) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
            verifier,
            config,
        }
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn into_utxo_pool(self) -> UtxoPool {
        self.utxo_pool
    }

    /// Returns true if:
    ///   1. All outputs claimed by the transaction are in the current UTXO pool.
    ///   2. The signatures on each input are valid.
    ///   3. No UTXO is claimed multiple times by the transaction.
    ///   4. All output values are non-negative.
    ///   5. The sum of input values is greater than or equal to the sum of output values.
    pub fn is_valid_tx(&self, transaction: &Transaction) -> bool {
        self.validate(transaction).is_ok()
    }

    /// Runs the checks of `is_valid_tx` in order and returns the first one that fails.
    /// The pool is never modified.
    pub fn validate(&self, transaction: &Transaction) -> Result<(), TxRejection> {
        self.check(transaction).map_err(|reason| {
            debug!("Transaction rejected: {}", reason);
            reason
        })
    }

    fn check(&self, transaction: &Transaction) -> Result<(), TxRejection> {
        let mut claimed_utxos = HashSet::new();
        let mut total_input = Amount::zero();

        for (input_index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            debug!("Processing input {} spending {}", input_index, utxo);

            let spent_output = self
                .utxo_pool
                .get(&utxo)
                .ok_or(TxRejection::MissingUtxo { input_index, utxo })?;

            if !self.is_signed_by_owner(transaction, input_index, input, spent_output) {
                return Err(TxRejection::InvalidSignature { input_index, utxo });
            }

            if !claimed_utxos.insert(utxo) {
                return Err(TxRejection::DoubleClaim { input_index, utxo });
            }

            total_input = total_input + spent_output.value();
        }

        let mut total_output = Amount::zero();
        for (output_index, output) in transaction.outputs().iter().enumerate() {
            let value = output.value();
            if !value.is_non_negative() {
                return Err(TxRejection::NegativeOutput {
                    output_index,
                    value,
                });
            }
            output_address(output_index)?;
            total_output = total_output + value;
        }

        match total_input.partial_cmp(&total_output) {
            Some(Ordering::Greater) | Some(Ordering::Equal) => Ok(()),
            // A NaN sum can't be compared, so it doesn't cover anything.
            Some(Ordering::Less) | None => Err(TxRejection::InsufficientInputs {
                inputs: total_input,
                outputs: total_output,
            }),
        }
    }

    /// Handles each epoch by receiving a batch of proposed transactions, checking each
    /// transaction for correctness, returning the accepted transactions, and updating the
    /// current UTXO pool.
    /// Transactions are evaluated in the order they are given, each against the pool left by
    /// the transactions accepted before it.
    pub fn handle_txs(&mut self, possible_txs: Vec<Transaction>) -> Vec<Transaction> {
        self.settle(possible_txs).accepted
    }

    /// Same as `handle_txs`, but also reports the rejected and the unprocessed transactions.
    pub fn settle(&mut self, possible_txs: Vec<Transaction>) -> Settlement {
        let batch_size = possible_txs.len();
        let mut settlement = Settlement::default();
        let mut candidates = possible_txs.into_iter().enumerate();

        while let Some((index, mut transaction)) = candidates.next() {
            match self.validate(&transaction) {
                Ok(()) => {
                    let hash = transaction.finalize();
                    self.apply(&transaction, hash);
                    debug!("Accepted transaction {}: {}", index, hash);
                    settlement.accepted.push(transaction);
                }
                Err(reason) => {
                    debug!("Rejected transaction {}: {}", index, reason);
                    settlement.rejected.push(RejectedTransaction {
                        index,
                        transaction,
                        reason,
                    });
                    if self.config.policy == BatchPolicy::StopAtFirstRejection {
                        settlement.unprocessed =
                            candidates.by_ref().map(|(_, tx)| tx).collect();
                        if !settlement.unprocessed.is_empty() {
                            warn!(
                                "Stopped at transaction {}, {} transactions not processed",
                                index,
                                settlement.unprocessed.len()
                            );
                        }
                        break;
                    }
                }
            }
        }

        info!(
            "Settled batch of {}: {} accepted, {} rejected, {} unprocessed",
            batch_size,
            settlement.accepted.len(),
            settlement.rejected.len(),
            settlement.unprocessed.len()
        );
        settlement
    }

    fn is_signed_by_owner(
        &self,
        transaction: &Transaction,
        input_index: usize,
        input: &TransactionInput,
        spent_output: &TransactionOutput,
    ) -> bool {
        match (input.signature(), transaction.raw_data_to_sign(input_index)) {
            (Some(signature), Some(message)) => {
                self.verifier.verify(spent_output.recipient(), &message, signature)
            }
            _ => false,
        }
    }

    // Preconditions:
    //   - The transaction is valid against the current pool, so every output index fits in u32.
    fn apply(&mut self, transaction: &Transaction, hash: TransactionHash) {
        for input in transaction.inputs() {
            self.utxo_pool.remove_utxo(&input.utxo());
        }
        for (index, output) in (0..=u32::MAX).zip(transaction.outputs()) {
            self.utxo_pool.add_utxo(Utxo::new(hash, index), output.clone());
        }
    }
}

// Outputs of an accepted transaction are added to the pool under a 32-bit index.
fn output_address(output_index: usize) -> Result<u32, TxRejection> {
    u32::try_from(output_index).map_err(|_| TxRejection::UnaddressableOutput { output_index })
}
