//! spherexsphinx CLI: configuration and cross-referencing for SPHEREx
//! documentation builds.
//!
//! Loads `spherexsphinx.toml`, derives the generator settings, and resolves
//! `spherexdoc` roles.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
