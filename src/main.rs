//! Grammarforge CLI - tree-sitter grammars to WebAssembly
//!
//! Entry point for the grammarforge command-line application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grammarforge::cli::output::{display_error, OutputConfig};
use grammarforge::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = OutputConfig::new(cli.quiet, cli.verbose);

    // Initialize tracing subscriber
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(output.env_filter(rust_log.as_deref()))
        .init();

    // Run the build and map the outcome to the exit status
    match cli.run(&output).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
