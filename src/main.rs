//! Binary entry point for the `xmlpretty` CLI.
use clap::Parser;
use tracing_subscriber::EnvFilter;
use xmlpretty::{Cli, pipeline};

fn main() {
    // Diagnostics are opt-in via RUST_LOG; normal CLI output stays plain
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let Some(options) = cli.into_options() else {
        println!("Please provide the path to the XML file using the -i/--input option.");
        return;
    };

    match pipeline::run(&options) {
        Ok(path) => println!("Formatted XML saved to: {}", path.display()),
        Err(e) => {
            eprintln!("An error occurred while processing the XML file:");
            eprintln!("{e}");
        }
    }
}
