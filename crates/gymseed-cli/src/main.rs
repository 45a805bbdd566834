//! Gymseed CLI Application
//!
//! Creates the smart gym database and loads the seed CSV files into it.

mod args;
mod cli;
mod renderer;

use anyhow::Result;
use args::Args;
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let renderer = TerminalRenderer::new(!args.no_color);

    info!("Gymseed started");

    Cli::new(renderer, args.json).build(args)
}
