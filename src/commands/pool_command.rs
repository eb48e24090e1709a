use crate::commands::{read_json, required_value};
use crate::UtxoPool;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct PoolCliOptions {
    pool: PathBuf,
}

impl PoolCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pool: PathBuf::from(required_value(matches, "pool")?),
        })
    }
}

pub fn pool_command() -> Command<'static> {
    Command::new("pool")
        .about("Lists the unspent outputs in the pool file.")
        .arg(
            Arg::new("pool")
                .long("pool")
                .value_name("FILE")
                .help("JSON file with the UTXO pool.")
                .takes_value(true)
                .required(true),
        )
}

pub fn run_pool_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = PoolCliOptions::parse(matches)?;
    let pool: UtxoPool = read_json(&options.pool)?;
    print!("{}", describe_pool(&pool));
    Ok(())
}

/// One line per UTXO, sorted, followed by the total value.
pub fn describe_pool(pool: &UtxoPool) -> String {
    let mut utxos = pool.all_utxos();
    utxos.sort();
    let mut description = String::new();
    for utxo in &utxos {
        if let Some(output) = pool.get(utxo) {
            description.push_str(&format!("{} {}\n", utxo, output));
        }
    }
    description.push_str(&format!(
        "{} unspent outputs, total: {}\n",
        utxos.len(),
        pool.total_value()
    ));
    description
}
