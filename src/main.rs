use anyhow::Result;
use clap::Parser;
use slot_status::{cli, error::UsageError};
use tracing::error;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        if tracing::dispatcher::has_been_set() {
            error!("{:#}", err);
        } else {
            eprintln!("error: {:#}", err);
        }
        let code = if err.downcast_ref::<UsageError>().is_some() { 2 } else { 1 };
        std::process::exit(code);
    }
    Ok(())
}
