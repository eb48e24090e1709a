use crate::commands::{parsed_value, read_json, required_value, write_json, CliError};
use crate::{KeyPair, Transaction};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

struct SignCliOptions {
    batch: PathBuf,
    tx: usize,
    input: usize,
    seed: String,
}

impl SignCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            batch: PathBuf::from(required_value(matches, "batch")?),
            tx: parsed_value(matches, "tx")?,
            input: parsed_value(matches, "input")?,
            seed: required_value(matches, "seed")?,
        })
    }
}

pub fn sign_command() -> Command<'static> {
    Command::new("sign")
        .about("Signs one input of a transaction in a batch file, in place.")
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("JSON file with the list of proposed transactions.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("tx")
                .long("tx")
                .value_name("INDEX")
                .help("Position of the transaction in the batch.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .value_name("INDEX")
                .help("Position of the input in the transaction.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed of the key pair that owns the spent output.")
                .takes_value(true)
                .required(true),
        )
}

pub fn run_sign_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SignCliOptions::parse(matches)?;
    let mut batch: Vec<Transaction> = read_json(&options.batch)?;
    let batch_len = batch.len();
    let transaction = batch
        .get_mut(options.tx)
        .ok_or_else(|| CliError::InvalidArgument {
            name: "tx".to_string(),
            reason: format!("the batch contains {} transactions", batch_len),
        })?;

    let key_pair = KeyPair::from_seed(options.seed.as_bytes())?;
    key_pair.sign_input(transaction, options.input)?;
    info!(
        "Signed input {} of transaction {} as {}",
        options.input,
        options.tx,
        key_pair.public_key()
    );
    write_json(&options.batch, &batch)?;
    Ok(())
}
