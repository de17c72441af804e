mod cmd;

use clap::Parser;
use cmd::config::{Cli, Commands, Effective};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.common) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Copy(args) => cmd::copy::run(&eff, &args),
        Commands::Batch(args) => cmd::batch::run(&eff, &args),
        Commands::Plan => cmd::plan::run(),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
