mod cli;
mod commands;
mod context;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            template,
            model,
            language,
            output,
        } => commands::render::run(template, model, language, output, cli.verbose),
        Commands::Generate { target } => commands::generate::run(target, cli.verbose),
        Commands::Check {
            template,
            model,
            language,
            json,
        } => commands::check::run(template, model, language, json),
        Commands::Vars { json } => commands::vars::run(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
