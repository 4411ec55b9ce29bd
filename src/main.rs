mod errors;
mod operations;
mod state;
mod ui;

use anyhow::{bail, Context, Result};
use buscador_core::{Category, CriteriaPatch, NumericRange, SortKey};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::errors::map_io_error;
use crate::operations::{load_config_file, read_raw_catalog};
use crate::state::AppState;

/// Auction listing search - filter, sort and page property and vehicle
/// auction catalogs
///
/// Examples:
///   # Every active property listing, newest first
///   buscador search catalog.json --sort newest
///
///   # Apartments in São Paulo between R$ 200k and R$ 600k
///   buscador search catalog.json --type apartments --state SP --price 200000:600000
///
///   # Fiat cars from 2015 on, second page, remembered for next time
///   buscador search catalog.json --category vehicle --type cars --brand Fiat \
///       --year 2015:2025 --page 2 --prefs prefs.json --save-prefs
///
///   # Check a catalog for malformed records
///   buscador validate catalog.json
#[derive(Parser, Debug)]
#[command(name = "buscador")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine settings file (JSON)
    #[arg(long, global = true, value_name = "FILE", env = "BUSCADOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, sort and page a catalog
    #[command(after_help = "Filtering Logic:\n  \
        - Scalar filters (state, city, format, brand, model, color) match one value\n  \
        - Multiple --origin or --stage values are combined with OR\n  \
        - Different filters are combined with AND\n  \
        - Ranges are inclusive; an inverted range matches nothing\n  \
        - Listings whose end date has passed are never shown\n\n\
    Sort Keys:\n  \
        newest, lowest-bid, highest-bid, highest-discount, nearest")]
    Search(SearchArgs),

    /// Report malformed catalog records
    Validate {
        /// Path to the catalog JSON file
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,
    },

    /// List sub-type slugs and their labels
    Types {
        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Path to the catalog JSON file
    #[arg(value_name = "CATALOG")]
    catalog: PathBuf,

    /// Listing category (property or vehicle)
    #[arg(short, long, default_value = "property")]
    category: Category,

    /// Sub-type slug (e.g. apartments, cars); see `buscador types`
    #[arg(short = 't', long = "type", value_name = "SLUG")]
    sub_type: Option<String>,

    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    city: Option<String>,

    /// Sale format (auction, direct-sale)
    #[arg(long)]
    format: Option<String>,

    /// Origin (judicial, extrajudicial, private, public); repeat for OR
    #[arg(long, value_name = "ORIGIN")]
    origin: Vec<String>,

    /// Auction stage (single-round, first, second, third); repeat for OR
    #[arg(long, value_name = "STAGE")]
    stage: Vec<String>,

    /// Initial bid range
    #[arg(long, value_name = "MIN:MAX")]
    price: Option<NumericRange>,

    /// Useful area range in m² (property only)
    #[arg(long, value_name = "MIN:MAX")]
    area: Option<NumericRange>,

    /// Model year range (vehicle only)
    #[arg(long, value_name = "MIN:MAX")]
    year: Option<NumericRange>,

    /// Vehicle brand
    #[arg(long)]
    brand: Option<String>,

    /// Vehicle model
    #[arg(long)]
    model: Option<String>,

    /// Vehicle color
    #[arg(long)]
    color: Option<String>,

    /// Result order
    #[arg(short, long, value_name = "KEY")]
    sort: Option<SortKey>,

    /// Free-text search over type, address, brand, model, city, state and source
    #[arg(short, long)]
    query: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Listings per page
    #[arg(long, env = "BUSCADOR_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Preferences file to restore filters and sort from
    #[arg(long, value_name = "FILE", env = "BUSCADOR_PREFS")]
    prefs: Option<PathBuf>,

    /// Write the applied filters and sort back to the preferences file
    #[arg(long, requires = "prefs")]
    save_prefs: bool,

    /// Evaluate "active" and "new" relative to this instant (RFC 3339)
    #[arg(long, value_name = "TIMESTAMP")]
    as_of: Option<DateTime<Utc>>,

    /// Print the page as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    /// Filter flags as staged edits, in flag order
    fn patches(&self) -> Vec<CriteriaPatch> {
        let mut patches = Vec::new();

        if let Some(v) = &self.state {
            patches.push(CriteriaPatch::State(Some(v.clone())));
        }
        if let Some(v) = &self.city {
            patches.push(CriteriaPatch::City(Some(v.clone())));
        }
        if let Some(v) = &self.format {
            patches.push(CriteriaPatch::Format(Some(v.clone())));
        }
        if !self.origin.is_empty() {
            patches.push(CriteriaPatch::Origin(self.origin.clone()));
        }
        if !self.stage.is_empty() {
            patches.push(CriteriaPatch::Stage(self.stage.clone()));
        }
        if let Some(v) = self.price {
            patches.push(CriteriaPatch::Price(v));
        }
        if let Some(v) = self.area {
            patches.push(CriteriaPatch::Area(v));
        }
        if let Some(v) = &self.brand {
            patches.push(CriteriaPatch::Brand(Some(v.clone())));
        }
        if let Some(v) = &self.model {
            patches.push(CriteriaPatch::Model(Some(v.clone())));
        }
        if let Some(v) = &self.color {
            patches.push(CriteriaPatch::Color(Some(v.clone())));
        }
        if let Some(v) = self.year {
            patches.push(CriteriaPatch::Year(v));
        }

        patches
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.chain().find_map(|e| e.downcast_ref::<buscador_core::IoError>()) {
            Some(io_err) => {
                let (title, message, details) = map_io_error(io_err);
                eprintln!("{} {}", title.red().bold(), message);
                eprintln!("\n{}", details);
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search(args) => search(args, cli.config),
        Command::Validate { catalog } => validate(catalog),
        Command::Types { category } => {
            let categories = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                ui::print_types(category);
            }
            Ok(())
        }
    }
}

fn search(args: SearchArgs, config_file: Option<PathBuf>) -> Result<()> {
    let mut config = load_config_file(config_file.as_deref())?;
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            bail!("--page-size must be at least 1");
        }
        config.page_size = page_size;
    }

    let mut app = AppState::open(&args.catalog, args.prefs.clone(), config, args.category)?;

    if let Some(sub_type) = &args.sub_type {
        if let Some(notice) = ui::sub_type_notice(app.session.category(), sub_type) {
            eprintln!("{} {}", "Warning:".yellow(), notice);
        }
        app.session.set_sub_type(sub_type);
    }
    if args.sort.is_some() {
        app.session.set_sort(args.sort);
    }
    if let Some(query) = &args.query {
        app.session.set_query(query.clone());
    }

    app.apply_edits(args.patches())
        .context("Invalid filter for this category")?;
    app.session.set_page(args.page);

    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let results = app.search(as_of);

    if args.json {
        ui::print_json(&results, app.session.config().page_size)?;
    } else {
        ui::print_results(&app, &results);
    }

    if args.save_prefs {
        app.save_preferences()?;
        eprintln!("{}", "Preferences saved".green());
    }

    Ok(())
}

fn validate(catalog: PathBuf) -> Result<()> {
    let raw = read_raw_catalog(&catalog)?;

    match buscador_core::validate_catalog(&raw) {
        Ok(()) => {
            let count = raw.as_array().map_or(0, Vec::len);
            println!("{} {} records are well formed", "✓".green(), count);
            Ok(())
        }
        Err(errors) => {
            eprintln!("Catalog validation failed:\n");
            for (i, error) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, error);
            }
            eprintln!("\nMalformed records are skipped when searching.");
            process::exit(1);
        }
    }
}
