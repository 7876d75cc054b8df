mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "verda",
    version,
    about = "Eco-impact scoring and catalog matching for everyday products"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a product label against a catalog
    Rate {
        /// Free-text product label, e.g. "plastic bottle"
        label: String,

        /// Detection confidence in [0,1]
        #[arg(short, long, default_value_t = 0.9)]
        confidence: f64,

        /// Catalog JSON file (default: builtin seed catalog)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Engine configuration JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Auto-learn unmatched high-confidence labels into the session catalog
        #[arg(long)]
        learn: bool,
    },
    /// Manage and inspect catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog entries
    List {
        /// Catalog JSON file (default: builtin seed catalog)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Validate a catalog JSON file
    Validate {
        /// Path to catalog JSON file
        file: PathBuf,
    },
    /// Print the catalog file format with field descriptions and an example
    Schema,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rate {
            label,
            confidence,
            catalog,
            config,
            output,
            learn,
        } => commands::rate::run(label, confidence, catalog, config, &output, learn),
        Commands::Catalog { action } => match action {
            CatalogAction::List { catalog, output } => commands::catalog::list(catalog, &output),
            CatalogAction::Validate { file } => commands::catalog::validate(&file),
            CatalogAction::Schema => commands::catalog::schema(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
