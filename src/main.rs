use clap::Parser;
use clinic_ledger::args::{Args, Command};
use clinic_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_backing_store() => {
            warn!("The spreadsheet is unavailable, nothing was changed: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Add(add_args) => commands::add(Config::load(home).await?, add_args)
            .await?
            .print(),

        Command::List(list_args) => commands::list(Config::load(home).await?, list_args)
            .await?
            .print_data(),

        Command::Update(update_args) => {
            commands::update(Config::load(home).await?, update_args)
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            commands::delete(Config::load(home).await?, delete_args)
                .await?
                .print()
        }

        Command::Export(export_args) => {
            commands::export(Config::load(home).await?, export_args)
                .await?
                .print()
        }

        Command::Summary => commands::summary(Config::load(home).await?)
            .await?
            .print_data(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
