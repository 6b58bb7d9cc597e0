use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::ModuleTag;

/// Reported form of one called module.
///
/// This is the element type of the `modules` array in
/// `module_predictions.json`. Synthetic domains are not listed in `domains`.
///
/// # Examples
///
/// ```rust
/// use modula_core::results::ModuleReport;
/// use modula_core::types::ModuleTag;
///
/// let report = ModuleReport {
///     protein_id: 42,
///     module_idx: 1,
///     protein_start: Some(10),
///     protein_stop: Some(1390),
///     tags: vec![ModuleTag { tag: "Mal".to_string(), rank: 1 }],
///     domains: vec!["42_10_430".to_string(), "42_540_850".to_string()],
/// };
/// let json = serde_json::to_string(&report)?;
/// assert!(json.starts_with(r#"{"protein_id":42,"module_idx":1"#));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReport {
    /// Protein owning the module
    pub protein_id: i64,
    /// 1-based position among the protein's modules
    pub module_idx: usize,
    /// Smallest start offset of the member domains
    pub protein_start: Option<i64>,
    /// Largest stop offset of the member domains
    pub protein_stop: Option<i64>,
    /// Ranked chemical tags
    pub tags: Vec<ModuleTag>,
    /// `{protein_id}_{start}_{stop}` keys of the predicted member domains
    pub domains: Vec<String>,
}

/// All modules called on one protein
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinModules {
    pub protein_id: i64,
    pub modules: Vec<ModuleReport>,
}

/// Module calling results for one genome directory.
#[derive(Debug, Clone)]
pub struct GenomeResults {
    /// Directory holding the genome's prediction files.
    pub genome_dir: PathBuf,

    /// Proteins with at least one valid module, in input order.
    ///
    /// Proteins without modules are absent rather than empty.
    pub proteins: Vec<ProteinModules>,

    /// Number of proteins read from the domain predictions.
    pub proteins_scanned: usize,
}

impl GenomeResults {
    /// Total number of modules across all proteins
    pub fn num_modules(&self) -> usize {
        self.proteins.iter().map(|p| p.modules.len()).sum()
    }
}

/// What happened to a genome directory during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenomeOutcome {
    /// Modules were called and written
    Completed {
        genome_dir: PathBuf,
        proteins: usize,
        modules: usize,
    },
    /// An existing module prediction file was kept
    Skipped { genome_dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(protein_id: i64, module_idx: usize) -> ModuleReport {
        ModuleReport {
            protein_id,
            module_idx,
            protein_start: None,
            protein_stop: None,
            tags: Vec::new(),
            domains: Vec::new(),
        }
    }

    #[test]
    fn test_num_modules() {
        let results = GenomeResults {
            genome_dir: PathBuf::from("genome"),
            proteins: vec![
                ProteinModules {
                    protein_id: 1,
                    modules: vec![report(1, 1), report(1, 2)],
                },
                ProteinModules {
                    protein_id: 2,
                    modules: vec![report(2, 1)],
                },
            ],
            proteins_scanned: 5,
        };
        assert_eq!(results.num_modules(), 3);
    }

    #[test]
    fn test_report_serializes_null_span() {
        let json = serde_json::to_value(report(3, 1)).unwrap();
        assert_eq!(json["protein_start"], serde_json::Value::Null);
        assert_eq!(json["protein_stop"], serde_json::Value::Null);
        assert_eq!(json["tags"], serde_json::json!([]));
    }
}
