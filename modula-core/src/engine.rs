//! Module calling engine.
//!
//! [`ModulaAnalyzer`] ties the pipeline together: prediction files are loaded
//! and filtered into domain records, each protein's domains are patched and
//! split into modules, and the resulting reports are written next to the
//! inputs. Genome directories are independent and run in parallel.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::ModulaConfig;
use crate::constants::{MODULE_PREDICTIONS_FILE, MODULE_UPLOAD_FILE};
use crate::filtering::filter_domains;
use crate::filtering::knn::KnnLookup;
use crate::module::{Module, detect_modules, patch_missing_domains};
use crate::output::{write_module_predictions, write_upload_records};
use crate::predictions::{GenomePredictions, ProteinRegions, load_genome_predictions};
use crate::results::{GenomeOutcome, GenomeResults, ProteinModules};
use crate::rules::RuleTable;
use crate::types::{DomainRecord, ModulaError};
use crate::upload::{TagLookup, prepare_upload_records};

/// Outcome of one genome directory in a batch
pub type BatchEntry = (PathBuf, Result<GenomeOutcome, ModulaError>);

/// High-level interface for calling modules on genome directories.
///
/// Holds the configuration and the characterization rules. The analyzer is
/// immutable once built and can be shared across worker threads.
///
/// # Examples
///
/// ## Calling modules on an in-memory domain list
///
/// ```rust
/// use modula_core::{ModulaAnalyzer, config::ModulaConfig};
/// use modula_core::types::{DomainLabel, DomainRecord};
///
/// let analyzer = ModulaAnalyzer::with_bundled_rules(ModulaConfig::default())?;
/// let domains = vec![
///     DomainRecord::new(DomainLabel::KetoSynthase, 42, 10, 430),
///     DomainRecord::new(DomainLabel::AcylTransferase, 42, 540, 850),
///     DomainRecord::new(DomainLabel::Thiolation, 42, 1320, 1390),
/// ];
///
/// let modules = analyzer.call_modules(&domains);
/// assert_eq!(modules.len(), 1);
/// assert_eq!(modules[0].to_string(), "KS AT T");
/// # Ok::<(), modula_core::types::ModulaError>(())
/// ```
///
/// ## Processing genome directories
///
/// ```rust,no_run
/// use modula_core::{ModulaAnalyzer, config::ModulaConfig};
///
/// let config = ModulaConfig {
///     num_threads: Some(4),
///     ..Default::default()
/// };
/// let analyzer = ModulaAnalyzer::with_bundled_rules(config)?;
///
/// for (genome_dir, outcome) in analyzer.run_batch(&["genomes/a", "genomes/b"])? {
///     println!("{}: {:?}", genome_dir.display(), outcome);
/// }
/// # Ok::<(), modula_core::types::ModulaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ModulaAnalyzer {
    /// Configuration options for module calling
    pub config: ModulaConfig,
    rules: RuleTable,
    tag_lookup: Option<TagLookup>,
}

impl ModulaAnalyzer {
    pub const fn new(config: ModulaConfig, rules: RuleTable) -> Self {
        Self {
            config,
            rules,
            tag_lookup: None,
        }
    }

    /// Creates an analyzer using the rule table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::ConfigError`] if `config` fails validation.
    pub fn with_bundled_rules(config: ModulaConfig) -> Result<Self, ModulaError> {
        config.validate()?;
        Ok(Self::new(config, RuleTable::bundled()?))
    }

    /// Also writes `module_upload.json` for each completed genome.
    #[must_use]
    pub fn with_tag_lookup(mut self, tag_lookup: TagLookup) -> Self {
        self.tag_lookup = Some(tag_lookup);
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Patches and partitions one protein's ordered domain list.
    pub fn call_modules(&self, domains: &[DomainRecord]) -> Vec<Module> {
        let patched = patch_missing_domains(domains);
        let modules = detect_modules(&patched);
        for module in &modules {
            debug!(
                protein_id = module.protein_id,
                module_idx = module.module_idx,
                module_type = %module.module_type(),
                layout = %module,
                "Called module"
            );
        }
        modules
    }

    /// Calls the modules of one protein.
    ///
    /// Returns `None` for proteins without regions or without any valid
    /// module.
    pub fn call_protein(
        &self,
        protein: &ProteinRegions,
        lookup: &KnnLookup,
    ) -> Option<ProteinModules> {
        if protein.regions.is_empty() {
            return None;
        }
        let domains = filter_domains(protein, lookup, self.config.min_domain_score);
        let reports: Vec<_> = self
            .call_modules(&domains)
            .iter()
            .filter_map(|module| module.report(&self.rules))
            .collect();

        if reports.is_empty() {
            None
        } else {
            Some(ProteinModules {
                protein_id: protein.protein_id,
                modules: reports,
            })
        }
    }

    /// Calls modules on already loaded predictions.
    pub fn predict_genome(
        &self,
        genome_dir: &Path,
        predictions: &GenomePredictions,
    ) -> GenomeResults {
        let lookup = KnnLookup::from_streams(&predictions.knn, &self.config);
        let proteins = predictions
            .proteins
            .iter()
            .filter_map(|protein| self.call_protein(protein, &lookup))
            .collect();

        GenomeResults {
            genome_dir: genome_dir.to_path_buf(),
            proteins,
            proteins_scanned: predictions.proteins.len(),
        }
    }

    /// Loads a genome directory and calls its modules without writing.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::MissingPrediction`] before reading anything if
    /// a prediction file is absent, or an I/O or JSON error if one cannot be
    /// parsed.
    pub fn predict_genome_dir(&self, genome_dir: &Path) -> Result<GenomeResults, ModulaError> {
        let predictions = load_genome_predictions(genome_dir)?;
        Ok(self.predict_genome(genome_dir, &predictions))
    }

    /// Processes one genome directory and writes `module_predictions.json`.
    ///
    /// Directories that already hold the output are skipped unless
    /// `overwrite` is set.
    pub fn run_genome_dir(&self, genome_dir: &Path) -> Result<GenomeOutcome, ModulaError> {
        let output_path = genome_dir.join(MODULE_PREDICTIONS_FILE);
        if output_path.exists() && !self.config.overwrite {
            warn!(
                genome_dir = %genome_dir.display(),
                "Module predictions already exist, skipping"
            );
            return Ok(GenomeOutcome::Skipped {
                genome_dir: genome_dir.to_path_buf(),
            });
        }

        let results = self.predict_genome_dir(genome_dir)?;

        // Both files are staged next to their targets; the predictions file is
        // renamed last so it only exists once the whole genome succeeded
        let format = self.config.output_format;
        let staged_predictions = stage_in(genome_dir, |writer| {
            write_module_predictions(writer, &results.proteins, format)
        })?;

        if let Some(tag_lookup) = &self.tag_lookup {
            let records = prepare_upload_records(&results.proteins, tag_lookup);
            let staged_upload =
                stage_in(genome_dir, |writer| write_upload_records(writer, &records, format))?;
            staged_upload
                .persist(genome_dir.join(MODULE_UPLOAD_FILE))
                .map_err(|e| e.error)?;
        }

        staged_predictions
            .persist(&output_path)
            .map_err(|e| e.error)?;

        info!(
            genome_dir = %genome_dir.display(),
            proteins = results.proteins_scanned,
            modules = results.num_modules(),
            "Module calling complete"
        );

        Ok(GenomeOutcome::Completed {
            genome_dir: results.genome_dir.clone(),
            proteins: results.proteins.len(),
            modules: results.num_modules(),
        })
    }

    /// Processes genome directories on a dedicated thread pool.
    ///
    /// A failing directory does not stop the others; every directory gets an
    /// entry in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::ConfigError`] only if the thread pool cannot be
    /// built.
    pub fn run_batch<P: AsRef<Path> + Sync>(
        &self,
        genome_dirs: &[P],
    ) -> Result<Vec<BatchEntry>, ModulaError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.config.num_threads {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder.build().map_err(|e| {
            ModulaError::ConfigError(format!("Failed to configure thread pool: {e}"))
        })?;

        Ok(pool.install(|| {
            genome_dirs
                .par_iter()
                .map(|genome_dir| {
                    let genome_dir = genome_dir.as_ref();
                    let outcome = self.run_genome_dir(genome_dir);
                    if let Err(e) = &outcome {
                        warn!(genome_dir = %genome_dir.display(), error = %e, "Genome failed");
                    }
                    (genome_dir.to_path_buf(), outcome)
                })
                .collect::<Vec<_>>()
        }))
    }
}

/// Writes a file into a temporary sibling in `dir`, ready to be persisted
fn stage_in<F>(dir: &Path, write: F) -> Result<NamedTempFile, ModulaError>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<(), ModulaError>,
{
    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut staged);
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(staged)
}
