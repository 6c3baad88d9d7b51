use clap::Parser;
use probecache_cache::CacheError;
use std::process::ExitCode;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "probecache")]
#[command(about = "Inspect and validate lookup cache snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = probecache_utils::tracing::init() {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            let code = e
                .downcast_ref::<CacheError>()
                .map_or(1, CacheError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
