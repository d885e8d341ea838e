mod app;
mod cli;
mod config;
mod core;
mod executors;
mod organizers;
mod reporters;
mod ui;
mod utils;

use crate::core::errors::ReconError;
use clap::Parser;

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = cli::args::Cli::parse();
    if let Err(err) = app::run(cli).await {
        match err.downcast_ref::<ReconError>() {
            Some(ReconError::MissingTools(missing)) => ui::printer::print_missing_tools(missing),
            _ => eprintln!("fatal: {:#}", err),
        }
        std::process::exit(1);
    }
}
