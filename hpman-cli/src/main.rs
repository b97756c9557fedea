//! CLI entrypoint for `hpman-cli`.

use clap::Parser;
use hpman_cli::{cli::Args, logging, run};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;
    let args = Args::parse();
    let stdout = std::io::stdout();
    run(&args, &mut stdout.lock()).map_err(color_eyre::eyre::Report::from)
}
