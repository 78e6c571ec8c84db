//! Faraid CLI: the `faraid` command.
//!
//! Collects the engine's two inputs (net estate, heir record) from flags or
//! a case file and renders the allocation.

mod case;
mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);

    match cli.command {
        Commands::Compute { case, json } => commands::compute::run(case, json),

        Commands::Explain { case, json } => commands::explain::run(case, json),

        Commands::Categories { json } => commands::categories::run(json),
    }
}
