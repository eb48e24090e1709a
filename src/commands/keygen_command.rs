use crate::commands::required_value;
use crate::KeyPair;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;

struct KeygenCliOptions {
    seed: String,
}

impl KeygenCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            seed: required_value(matches, "seed")?,
        })
    }
}

pub fn keygen_command() -> Command<'static> {
    Command::new("keygen")
        .about("Prints the public key derived from the seed.")
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Secret seed the key pair is derived from.")
                .takes_value(true)
                .required(true),
        )
}

pub fn run_keygen_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = KeygenCliOptions::parse(matches)?;
    let key_pair = KeyPair::from_seed(options.seed.as_bytes())?;
    println!("{}", key_pair.public_key());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed() {
        let matches = keygen_command().get_matches_from(vec!["keygen", "--seed", "alice"]);
        let options = KeygenCliOptions::parse(&matches).unwrap();
        assert_eq!(options.seed, "alice");
    }

    #[test]
    fn seed_is_required() {
        assert!(keygen_command()
            .try_get_matches_from(vec!["keygen"])
            .is_err());
    }
}
