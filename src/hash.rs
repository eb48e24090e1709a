use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt::{Display, Formatter};
use thiserror::Error;

const SHA256_BYTE_COUNT: usize = 32;

#[derive(Error, Debug, PartialEq)]
pub enum HashError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Invalid SHA-256 length. Expected: {expected} but got: {actual} in: {input}")]
    InvalidLength {
        expected: usize,
        actual: usize,
        input: String,
    },
}

/// Sha-256 is a 256-bit array or 32 bytes.
/// It provides an API to display as hex-encoded string and parse it from a hex-encoded string.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sha256([u8; SHA256_BYTE_COUNT]);

impl Sha256 {
    pub const fn from_raw(raw_bytes: [u8; SHA256_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        let mut output = [0; SHA256_BYTE_COUNT];
        output.copy_from_slice(&hasher.finalize());
        Sha256::from_raw(output)
    }

    /// Hashes the data twice, the same way transaction hashes are computed in Bitcoin.
    pub fn double_digest(data: &[u8]) -> Self {
        let first_hash = Self::digest(data);
        Self::digest(first_hash.as_slice())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != SHA256_BYTE_COUNT {
            return Err(HashError::InvalidLength {
                expected: SHA256_BYTE_COUNT,
                actual: bytes.len(),
                input: s.to_string(),
            });
        }
        let mut sha = [0; SHA256_BYTE_COUNT];
        sha.copy_from_slice(&bytes);
        Ok(Sha256::from_raw(sha))
    }
}

impl Display for Sha256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_hello_world() {
        assert_eq!(
            Sha256::digest(b"hello world").to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn double_digest_hashes_the_hash() {
        let once = Sha256::digest(b"hello world");
        assert_eq!(
            Sha256::double_digest(b"hello world"),
            Sha256::digest(once.as_slice())
        );
    }

    #[test]
    fn from_hex_parses_display_output() {
        let hash = Sha256::digest(b"scrooge");
        assert_eq!(Sha256::from_hex(&hash.to_string()), Ok(hash));
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Sha256::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidLength {
                expected: 32,
                actual: 2,
                input: "abcd".to_string(),
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(matches!(
            Sha256::from_hex("not hex"),
            Err(HashError::InvalidHex(_))
        ));
    }
}
