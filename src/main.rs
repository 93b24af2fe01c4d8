use medid_resolver::config::ResolverConfig;
use medid_resolver::db::{DictionaryStore, SeedSource, SqliteDictionaryStore};
use medid_resolver::matcher::MatchMode;
use medid_resolver::report;
use medid_resolver::resolution::ResolutionEngine;
use medid_resolver::tokenizer::normalize;
use medid_resolver::types::Fragment;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medid")]
#[command(about = "Resolve OCR text fragments to canonical medicine names")]
#[command(version)]
struct Args {
    /// Path to the medicine dictionary (or set MEDID_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the dictionary (built-in sample list unless a file is given)
    Seed {
        /// CSV file with a `text,label` header; MED_NAME rows are imported
        #[arg(long, conflicts_with = "text")]
        csv: Option<PathBuf>,

        /// Plain text file with one name per line
        #[arg(long)]
        text: Option<PathBuf>,
    },
    /// Classify text fragments
    Resolve {
        /// Fragments to classify
        fragments: Vec<String>,

        /// OCR output JSON (`[{"text": ..., "confidence": ...}]` or `["..."]`), `-` for stdin
        #[arg(short, long, conflicts_with = "fragments")]
        input: Option<PathBuf>,

        /// Print records as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Fuzzy match selection: first or best
        #[arg(long)]
        mode: Option<MatchMode>,

        /// Largest accepted edit distance
        #[arg(long)]
        max_distance: Option<usize>,

        /// Per-fragment fuzzy matching budget in milliseconds
        #[arg(long)]
        budget_ms: Option<u64>,

        /// Keep only fragments whose OCR confidence is strictly above this value
        #[arg(long)]
        min_ocr_confidence: Option<f64>,

        /// Classify fragments in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Look up a name exactly
    Lookup {
        name: String,
    },
    /// List every canonical name in store order
    List,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ResolverConfig::from_env().context("Invalid resolver configuration")?;
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let result = match args.command {
        Commands::Seed { csv, text } => run_seed(&config, csv, text),
        Commands::Resolve {
            fragments,
            input,
            json,
            mode,
            max_distance,
            budget_ms,
            min_ocr_confidence,
            parallel,
        } => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(max_distance) = max_distance {
                config.max_distance = max_distance;
            }
            if let Some(ms) = budget_ms {
                config.fuzzy_budget = Some(Duration::from_millis(ms));
            }
            config.validate()?;

            let fragments = collect_fragments(fragments, input, min_ocr_confidence)?;
            run_resolve(&config, &fragments, json, parallel)
        }
        Commands::Lookup { name } => run_lookup(&config, &name),
        Commands::List => run_list(&config),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn run_seed(config: &ResolverConfig, csv: Option<PathBuf>, text: Option<PathBuf>) -> Result<()> {
    let source = match (csv, text) {
        (Some(path), _) => SeedSource::Csv(path),
        (None, Some(path)) => SeedSource::Text(path),
        (None, None) => SeedSource::BuiltIn,
    };

    let names = source
        .load()
        .with_context(|| format!("Failed to read seed source {:?}", source))?;
    let store = SqliteDictionaryStore::from_config(config);
    let summary = store.seed(&names)?;

    println!(
        "Seeded {}: {} offered, {} new, {} total",
        store.path().display(),
        summary.offered,
        summary.inserted,
        summary.total
    );
    Ok(())
}

fn collect_fragments(
    fragments: Vec<String>,
    input: Option<PathBuf>,
    min_ocr_confidence: Option<f64>,
) -> Result<Vec<Fragment>> {
    let fragments: Vec<Fragment> = match input {
        Some(path) => {
            let content = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
            };
            serde_json::from_str(&content).context("Input is not a JSON list of fragments")?
        }
        None => fragments.into_iter().map(Fragment::from).collect(),
    };

    if fragments.is_empty() {
        bail!("No fragments given; pass them as arguments or with --input");
    }

    let Some(threshold) = min_ocr_confidence else {
        return Ok(fragments);
    };
    let before = fragments.len();
    let kept: Vec<Fragment> = fragments
        .into_iter()
        .filter(|f| f.passes_confidence(threshold))
        .collect();
    info!(
        "Kept {} of {} fragments at OCR confidence > {}",
        kept.len(),
        before,
        threshold
    );
    Ok(kept)
}

fn run_resolve(
    config: &ResolverConfig,
    fragments: &[Fragment],
    json: bool,
    parallel: bool,
) -> Result<()> {
    let engine = ResolutionEngine::new(SqliteDictionaryStore::from_config(config), config);
    let records = if parallel {
        engine.resolve_parallel(fragments)?
    } else {
        engine.resolve(fragments)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", report::render_report(&records));
    }
    Ok(())
}

fn run_lookup(config: &ResolverConfig, name: &str) -> Result<()> {
    let store = SqliteDictionaryStore::from_config(config);
    match store.exact_lookup(&normalize(name))? {
        Some(found) => println!("{}", found),
        None => println!("'{}' is not in the dictionary", name),
    }
    Ok(())
}

fn run_list(config: &ResolverConfig) -> Result<()> {
    let store = SqliteDictionaryStore::from_config(config);
    let names = store.load_all()?;
    println!("{}", names.iter().join("\n"));
    info!("{} canonical names in {}", names.len(), store.path().display());
    Ok(())
}
