//! Studagent - Entry Point
//!
//! Binary entry point; the commands live in [`studagent::cli`].

// Force-link studagent-providers to ensure linkme registrations are included
extern crate studagent_providers;

use clap::Parser;
use studagent::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
