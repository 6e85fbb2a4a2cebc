//! CLI application for Thai e-Tax Invoice code lists.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{classify, config, encode, lists, resolve, scan};

/// Thai e-Tax code lists - resolve, translate and check reference codes
#[derive(Parser)]
#[command(name = "etax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve codes against a code list
    Resolve(resolve::ResolveArgs),

    /// Show the XML lexical form of codes
    Encode(encode::EncodeArgs),

    /// Decompose and classify a structured code
    Classify(classify::ClassifyArgs),

    /// List code-list policies
    Lists(lists::ListsArgs),

    /// Resolve every code element of an e-Tax XML document
    Scan(scan::ScanArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Resolve(args) => resolve::run(args, config_path),
        Commands::Encode(args) => encode::run(args, config_path),
        Commands::Classify(args) => classify::run(args, config_path),
        Commands::Lists(args) => lists::run(args, config_path),
        Commands::Scan(args) => scan::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
