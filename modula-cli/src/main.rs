//! # Modula CLI - Command-Line Module Caller
//!
//! Calls PKS/NRPS modules for one or more genome directories. Each directory
//! must hold the domain predictions and the six k-NN prediction files; the
//! modules are written to `module_predictions.json` in the same directory.
//!
//! ## Usage
//!
//! ```bash
//! # Call modules for two genomes
//! modula -i genomes/GCF_000001 genomes/GCF_000002
//!
//! # Stricter domain calls, recompute existing outputs, 8 workers
//! modula -i genomes/* --min-domain-score 0.7 --overwrite -j 8
//!
//! # Also prepare graph upload records
//! modula -i genomes/GCF_000001 --tag-lookup module_tags.json
//! ```
//!
//! ## Options
//!
//! - `-i, --input <DIR>...`: Genome directories
//! - `-r, --rules <FILE>`: Characterization rules (default: bundled table)
//! - `-c, --config <FILE>`: TOML configuration file
//! - `-j, --threads <N>`: Worker threads (default: all cores)
//! - `--min-domain-score <F>`: Domain predictor score threshold
//! - `--min-functional-score <F>`: Homology needed to call KR/DH/ER inactive
//! - `--min-subclass-score <F>`: Homology needed to call a B-type T domain
//! - `-p, --pretty`: Indent the JSON output
//! - `--overwrite`: Recompute genomes that already have module predictions
//! - `--tag-lookup <FILE>`: Write `module_upload.json` using this tag lookup
//! - `-q, --quiet`: Only log warnings, no summary
//! - `-v, --verbose`: Log every called module
//!
//! Logging honours `RUST_LOG` when set.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use modula_core::config::{ModulaConfig, OutputFormat};
use modula_core::results::GenomeOutcome;
use modula_core::rules::RuleTable;
use modula_core::upload::TagLookup;
use modula_core::ModulaAnalyzer;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command {
    Command::new("modula")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Module calling for PKS/NRPS biosynthetic gene clusters")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("DIR")
                .num_args(1..)
                .action(ArgAction::Append)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Genome directories holding the prediction files"),
        )
        .arg(
            Arg::new("rules")
                .short('r')
                .long("rules")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Characterization rules JSON (default: bundled table)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of worker threads (default: all cores)"),
        )
        .arg(
            Arg::new("min-domain-score")
                .long("min-domain-score")
                .value_name("SCORE")
                .value_parser(value_parser!(f64))
                .help("Minimum domain predictor score"),
        )
        .arg(
            Arg::new("min-functional-score")
                .long("min-functional-score")
                .value_name("SCORE")
                .value_parser(value_parser!(f64))
                .help("Minimum homology to call KR/DH/ER domains inactive"),
        )
        .arg(
            Arg::new("min-subclass-score")
                .long("min-subclass-score")
                .value_name("SCORE")
                .value_parser(value_parser!(f64))
                .help("Minimum homology to call B-type T domains"),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .action(ArgAction::SetTrue)
                .help("Indent the JSON output"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Recompute genomes with existing module predictions"),
        )
        .arg(
            Arg::new("tag-lookup")
                .long("tag-lookup")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Tag lookup JSON; also writes module_upload.json"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Quiet mode"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every called module"),
        )
}

fn init_logger(quiet: bool, verbose: bool) {
    let default_directive = if verbose {
        "modula=debug"
    } else if quiet {
        "modula=warn"
    } else {
        "modula=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Layers command-line overrides on top of the file or default configuration.
fn build_config(matches: &ArgMatches) -> Result<ModulaConfig, Box<dyn std::error::Error>> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ModulaConfig::from_toml_file(path)?,
        None => ModulaConfig::default(),
    };

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config.num_threads = Some(threads);
    }
    if let Some(&score) = matches.get_one::<f64>("min-domain-score") {
        config.min_domain_score = score;
    }
    if let Some(&score) = matches.get_one::<f64>("min-functional-score") {
        config.min_functional_score = score;
    }
    if let Some(&score) = matches.get_one::<f64>("min-subclass-score") {
        config.min_subclass_score = score;
    }
    if matches.get_flag("pretty") {
        config.output_format = OutputFormat::JsonPretty;
    }
    if matches.get_flag("overwrite") {
        config.overwrite = true;
    }
    if matches.get_flag("quiet") {
        config.quiet = true;
    }

    config.validate()?;
    Ok(config)
}

/// Main entry point for the Modula CLI application.
///
/// Exits with an error if any genome directory failed; the others are still
/// processed and written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    init_logger(matches.get_flag("quiet"), matches.get_flag("verbose"));

    let config = build_config(&matches)?;
    let rules = match matches.get_one::<PathBuf>("rules") {
        Some(path) => RuleTable::from_json_file(path)?,
        None => RuleTable::bundled()?,
    };
    let quiet = config.quiet;

    let mut analyzer = ModulaAnalyzer::new(config, rules);
    if let Some(path) = matches.get_one::<PathBuf>("tag-lookup") {
        analyzer = analyzer.with_tag_lookup(TagLookup::from_json_file(path)?);
    }

    let genome_dirs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("input")
        .map(|dirs| dirs.cloned().collect())
        .unwrap_or_default();
    let entries = analyzer.run_batch(&genome_dirs)?;

    let (mut completed, mut skipped, mut modules) = (0, 0, 0);
    let mut failed = Vec::new();
    for (genome_dir, outcome) in &entries {
        match outcome {
            Ok(GenomeOutcome::Completed { modules: count, .. }) => {
                completed += 1;
                modules += *count;
            }
            Ok(GenomeOutcome::Skipped { .. }) => skipped += 1,
            Err(e) => failed.push(format!("{}: {e}", genome_dir.display())),
        }
    }

    if !quiet {
        eprintln!(
            "Module calling complete! {completed} processed, {skipped} skipped, {} failed; {modules} modules called.",
            failed.len()
        );
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} genome(s) failed:\n{}", failed.len(), failed.join("\n")).into())
    }
}
