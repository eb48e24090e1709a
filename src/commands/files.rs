use clap::ArgMatches;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn required_value(matches: &ArgMatches, name: &str) -> Result<String, CliError> {
    matches
        .value_of(name)
        .map(str::to_string)
        .ok_or_else(|| CliError::MissingArgument(name.to_string()))
}

pub fn parsed_value<T>(matches: &ArgMatches, name: &str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    required_value(matches, name)?
        .parse::<T>()
        .map_err(|e| CliError::InvalidArgument {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, KeyPair, Sha256, TransactionHash, TransactionOutput, Utxo, UtxoPool};

    #[test]
    fn pool_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let owner = KeyPair::from_seed(b"alice").unwrap().public_key();
        let pool = vec![(
            Utxo::new(TransactionHash::new(Sha256::digest(b"genesis")), 0),
            TransactionOutput::new(owner, Amount::from(10)),
        )]
        .into_iter()
        .collect::<UtxoPool>();

        write_json(&path, &pool).unwrap();
        assert_eq!(read_json::<UtxoPool>(&path).unwrap(), pool);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            read_json::<UtxoPool>(&path),
            Err(CliError::Io { .. })
        ));
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_json::<UtxoPool>(&path),
            Err(CliError::Json { .. })
        ));
    }
}
