mod cli;
mod fetch;
mod reading;
mod store;

use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Collect {
            api_key,
            coords,
            output,
            baseline,
        } => command::collect(&api_key, &coords, output, baseline).await,
        Commands::List { output } => command::list(output),
        Commands::Show { file, output } => command::show(file, output),
    };

    if let Err(e) = outcome {
        eprintln!();
        eprintln!("✗ Error: {e}");
        eprintln!();
        std::process::exit(1);
    }
}
