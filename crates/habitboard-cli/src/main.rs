use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitboard", version, about = "Habitify streak report for TRMNL displays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report and push it to the TRMNL webhook
    Run,
    /// Build the report and print it without delivering
    Report,
    /// Response cache maintenance
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Report => commands::report::run(),
        Commands::Cache { action } => commands::cache::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
