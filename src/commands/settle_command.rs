use crate::commands::{read_json, required_value, write_json, CliError};
use crate::{
    BatchPolicy, EcdsaVerifier, HandlerConfig, Settlement, Transaction, TxHandler, UtxoPool,
};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

struct SettleCliOptions {
    pool: PathBuf,
    batch: PathBuf,
    output: PathBuf,
    policy: BatchPolicy,
}

impl SettleCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let pool = PathBuf::from(required_value(matches, "pool")?);
        // The updated pool replaces the input pool unless an output file is given.
        let output = matches
            .value_of("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| pool.clone());
        Ok(Self {
            pool,
            batch: PathBuf::from(required_value(matches, "batch")?),
            output,
            policy: parse_policy(&required_value(matches, "policy")?)?,
        })
    }
}

fn parse_policy(value: &str) -> Result<BatchPolicy, CliError> {
    match value {
        "stop" => Ok(BatchPolicy::StopAtFirstRejection),
        "skip" => Ok(BatchPolicy::SkipRejected),
        _ => Err(CliError::InvalidArgument {
            name: "policy".to_string(),
            reason: format!("unknown policy: {}", value),
        }),
    }
}

pub fn settle_command() -> Command<'static> {
    Command::new("settle")
        .about("Settles a batch of transactions against the UTXO pool.")
        .arg(
            Arg::new("pool")
                .long("pool")
                .value_name("FILE")
                .help("JSON file with the current UTXO pool.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("JSON file with the list of proposed transactions.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FILE")
                .help("Where to write the updated pool. Defaults to the input pool file.")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .value_name("POLICY")
                .help("What to do after a rejected transaction: stop or skip to the next one.")
                .takes_value(true)
                .possible_values(["stop", "skip"])
                .default_value("stop"),
        )
}

pub fn run_settle_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SettleCliOptions::parse(matches)?;
    let pool: UtxoPool = read_json(&options.pool)?;
    let batch: Vec<Transaction> = read_json(&options.batch)?;
    info!(
        "Loaded {} unspent outputs and {} proposed transactions",
        pool.len(),
        batch.len()
    );

    let config = HandlerConfig {
        policy: options.policy,
    };
    let (settlement, updated_pool) = settle(&pool, batch, config);
    print!("{}", describe_settlement(&settlement));

    write_json(&options.output, &updated_pool)?;
    info!(
        "Wrote {} unspent outputs to {}",
        updated_pool.len(),
        options.output.display()
    );
    Ok(())
}

/// Settles the batch against a copy of the pool and returns the outcome with the updated pool.
pub fn settle(
    pool: &UtxoPool,
    batch: Vec<Transaction>,
    config: HandlerConfig,
) -> (Settlement, UtxoPool) {
    let mut handler = TxHandler::with_verifier(pool, EcdsaVerifier, config);
    let settlement = handler.settle(batch);
    (settlement, handler.into_utxo_pool())
}

pub fn describe_settlement(settlement: &Settlement) -> String {
    let mut description = String::new();
    for transaction in &settlement.accepted {
        if let Some(hash) = transaction.hash() {
            description.push_str(&format!("accepted {}\n", hash));
        }
    }
    for rejected in &settlement.rejected {
        description.push_str(&format!(
            "rejected transaction {}: {}\n",
            rejected.index, rejected.reason
        ));
    }
    if !settlement.unprocessed.is_empty() {
        description.push_str(&format!(
            "{} transactions not processed\n",
            settlement.unprocessed.len()
        ));
    }
    description
}
