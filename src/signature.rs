use crate::{PublicKey, Sha256, Transaction};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(#[from] k256::ecdsa::Error),

    #[error("Transaction has no input at index: {0}")]
    InputOutOfBounds(usize),
}

/// Checks that a signature over the message was produced by the owner of the public key.
/// Malformed keys or signatures must verify as false rather than fail.
pub trait SignatureVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        (**self).verify(public_key, message, signature)
    }
}

/// ECDSA over secp256k1 with SHA-256 message digests.
/// Public keys are SEC1 encoded, signatures are the fixed-size 64-byte (r, s) encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let verifying_key = match VerifyingKey::from_sec1_bytes(public_key.as_slice()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match Signature::from_slice(signature) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        Verifier::verify(&verifying_key, message, &signature).is_ok()
    }
}

/// A secp256k1 signing key and the public key derived from it.
#[derive(Clone, Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Derives the key pair deterministically from the seed, so the same seed always yields
    /// the same identity.
    pub fn from_seed(seed: &[u8]) -> Result<Self, SignatureError> {
        let secret = Sha256::digest(seed);
        let signing_key = SigningKey::from_slice(secret.as_slice())?;
        Ok(Self { signing_key })
    }

    pub fn public_key(&self) -> PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        PublicKey::new(verifying_key.to_encoded_point(true).as_bytes().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }

    /// Signs the input at the given index and attaches the signature to the transaction.
    pub fn sign_input(
        &self,
        transaction: &mut Transaction,
        index: usize,
    ) -> Result<(), SignatureError> {
        let message = transaction
            .raw_data_to_sign(index)
            .ok_or(SignatureError::InputOutOfBounds(index))?;
        transaction
            .add_signature(self.sign(&message), index)
            .map_err(|_| SignatureError::InputOutOfBounds(index))
    }
}
