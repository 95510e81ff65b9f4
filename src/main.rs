use anyhow::Result;
use clap::Parser;
use leftovers::cli::{self, Cli};
use leftovers::logging::init_logging;

fn main() -> Result<()> {
    init_logging();

    cli::run(Cli::parse())
}
