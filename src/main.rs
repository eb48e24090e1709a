use clap::{Arg, Command};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("scroogecoin")
        .about("ScroogeCoin transaction validation and batch settlement tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Logs every validation step.")
                .global(true),
        )
        .subcommand(scroogecoin_lib::commands::keygen_command())
        .subcommand(scroogecoin_lib::commands::sign_command())
        .subcommand(scroogecoin_lib::commands::settle_command())
        .subcommand(scroogecoin_lib::commands::pool_command())
        .get_matches();

    init_logging(matches.is_present("verbose"));

    match matches.subcommand() {
        Some(("keygen", matches)) => scroogecoin_lib::commands::run_keygen_command(matches),
        Some(("sign", matches)) => scroogecoin_lib::commands::run_sign_command(matches),
        Some(("settle", matches)) => scroogecoin_lib::commands::run_settle_command(matches),
        Some(("pool", matches)) => scroogecoin_lib::commands::run_pool_command(matches),
        _ => unreachable!("clap requires a known subcommand"),
    }
}

// RUST_LOG takes precedence unless --verbose is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
