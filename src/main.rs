use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use curtain_pricing::{
    io,
    models::{Catalog, PriceMode},
    pricing::{Calculator, PriceEngine, Quote, RoundingPolicy},
    settings::Settings,
    visualization::{print_catalog_table, print_comparison_table, print_price, print_quote_table},
};

#[derive(Parser)]
#[command(
    name = "curtain-pricer",
    about = "Curtain Pricer - made-to-measure curtain and blind pricing",
    version,
    author
)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Round rail totals to cents before the ceiling, like area totals
    #[arg(long, global = true)]
    uniform_rounding: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price one product at a requested size
    Price {
        /// Catalog file (CSV, JSON, TOML, or Excel)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Product id
        #[arg(short, long)]
        product: String,

        /// Width in centimetres
        #[arg(short, long)]
        width: f64,

        /// Height in centimetres
        #[arg(short = 'H', long, default_value = "0")]
        height: f64,

        /// Price list: standard or platform
        #[arg(short, long)]
        mode: Option<String>,

        /// Exit with an error when the size is rejected
        #[arg(long)]
        strict: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank every product of a category at one size, cheapest first
    Compare {
        /// Catalog file (CSV, JSON, TOML, or Excel)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Category to compare
        #[arg(short = 'k', long)]
        category: String,

        /// Width in centimetres
        #[arg(short, long)]
        width: f64,

        /// Height in centimetres
        #[arg(short = 'H', long)]
        height: f64,

        /// Price list: standard or platform
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Price a cart file (product_id,width_cm,height_cm,quantity)
    Quote {
        /// Catalog file (CSV, JSON, TOML, or Excel)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Cart CSV file
        #[arg(long)]
        cart: PathBuf,

        /// Price list: standard or platform
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Convert a catalog between formats
    Convert {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the products of a catalog
    List {
        /// Catalog file (CSV, JSON, TOML, or Excel)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curtain_pricing=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => Settings::load(p)
            .with_context(|| format!("Failed to load settings from {}", p.display())),
        None => Ok(Settings::default()),
    }
}

fn load_catalog(flag: Option<PathBuf>, settings: &Settings) -> Result<Catalog> {
    let Some(path) = flag.or_else(|| settings.catalog.clone()) else {
        anyhow::bail!("No catalog given. Pass --catalog or set `catalog` in the settings file");
    };
    io::read_catalog(&path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn resolve_mode(flag: Option<String>, settings: &Settings) -> Result<PriceMode> {
    match flag {
        Some(m) => Ok(m.parse()?),
        None => Ok(settings.price_mode),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    let engine = if cli.uniform_rounding {
        PriceEngine::new(RoundingPolicy::Uniform)
    } else {
        settings.engine()
    };
    tracing::debug!(rounding = %engine.rounding, "engine ready");

    match cli.command {
        Commands::Price {
            catalog,
            product,
            width,
            height,
            mode,
            strict,
            json,
        } => {
            let catalog = load_catalog(catalog, &settings)?;
            let mode = resolve_mode(mode, &settings)?;
            let item = catalog.get(&product)?;
            let outcome = item.price(width, height, mode, &engine);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_price(item, width, height, &outcome);
                println!();
            }

            if strict {
                if let Some(reason) = outcome.rejection() {
                    anyhow::bail!("Size rejected for {product}: {reason}");
                }
            }
        }

        Commands::Compare {
            catalog,
            category,
            width,
            height,
            mode,
        } => {
            let catalog = load_catalog(catalog, &settings)?;
            let mode = resolve_mode(mode, &settings)?;
            if !catalog.categories().contains(&category) {
                anyhow::bail!(
                    "Unknown category: {category}. Available: {}",
                    catalog.categories().join(", ")
                );
            }

            let calculator = Calculator::new(&catalog, engine);
            let ranked = calculator.compare(&category, width, height, mode);
            print_comparison_table(&category, width, height, &ranked);
            println!();
        }

        Commands::Quote {
            catalog,
            cart,
            mode,
        } => {
            let catalog = load_catalog(catalog, &settings)?;
            let mode = resolve_mode(mode, &settings)?;
            let lines = io::read_cart_csv(&cart)
                .with_context(|| format!("Failed to read cart {}", cart.display()))?;

            let quote = Quote::build(&catalog, &lines, mode, engine)?;
            print_quote_table(&quote);
            println!();
        }

        Commands::Convert {
            input,
            output,
            pretty,
        } => {
            let catalog = io::read_catalog(&input)?;
            io::writer_for(&output, pretty)?.write(&catalog, &output)?;

            println!(
                "{} Converted {} -> {}",
                "Success:".green().bold(),
                input.display(),
                output.display()
            );
        }

        Commands::List { catalog } => {
            let catalog = load_catalog(catalog, &settings)?;
            print_catalog_table(&catalog);
            println!();
        }
    }

    Ok(())
}
