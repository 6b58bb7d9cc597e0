//! Upstream prediction files of a genome directory.
//!
//! Each genome directory holds the domain predictor output and one k-NN
//! result file per classified domain type. All of them must be present before
//! any module calling starts.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::constants::DOMAIN_PREDICTIONS_FILE;
use crate::filtering::knn::KnnTarget;
use crate::types::ModulaError;

/// One domain call from the domain predictor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainRegion {
    pub domain_id: i64,
    pub label: String,
    pub score: f64,
    pub protein_start: i64,
    pub protein_stop: i64,
}

/// Domain calls of one protein, ordered by position
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProteinRegions {
    pub protein_id: i64,
    pub regions: Vec<DomainRegion>,
}

/// A single nearest-neighbour label call; extra fields are ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KnnPrediction {
    pub label: String,
    pub homology: f64,
    pub rank: u32,
}

/// Ranked k-NN calls for one domain, keyed by its `domain_id`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KnnQuery {
    pub query_id: i64,
    pub predictions: Vec<KnnPrediction>,
}

/// Every prediction stream of one genome
#[derive(Debug, Clone, Default)]
pub struct GenomePredictions {
    pub proteins: Vec<ProteinRegions>,
    pub knn: Vec<(KnnTarget, Vec<KnnQuery>)>,
}

/// Files that must exist in a genome directory, with the kind they carry
pub fn required_prediction_files(genome_dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files = vec![(
        "domain".to_string(),
        genome_dir.join(DOMAIN_PREDICTIONS_FILE),
    )];
    files.extend(KnnTarget::ALL.iter().map(|target| {
        (
            target.label().as_str().to_string(),
            genome_dir.join(target.file_name()),
        )
    }));
    files
}

/// Fails on the first missing prediction file.
///
/// # Errors
///
/// Returns [`ModulaError::MissingPrediction`] naming the missing kind.
pub fn check_required_files(genome_dir: &Path) -> Result<(), ModulaError> {
    for (kind, path) in required_prediction_files(genome_dir) {
        if !path.is_file() {
            return Err(ModulaError::MissingPrediction { kind, path });
        }
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ModulaError> {
    let file = File::open(path.as_ref())?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Loads all prediction streams after checking that every file exists.
pub fn load_genome_predictions(genome_dir: &Path) -> Result<GenomePredictions, ModulaError> {
    check_required_files(genome_dir)?;

    let mut knn = Vec::with_capacity(KnnTarget::ALL.len());
    for target in KnnTarget::ALL {
        let queries: Vec<KnnQuery> = read_json(genome_dir.join(target.file_name()))?;
        knn.push((target, queries));
    }
    let proteins: Vec<ProteinRegions> = read_json(genome_dir.join(DOMAIN_PREDICTIONS_FILE))?;

    Ok(GenomePredictions { proteins, knn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_empty_genome(dir: &Path) {
        for (_, path) in required_prediction_files(dir) {
            fs::write(path, "[]").unwrap();
        }
    }

    #[test]
    fn test_required_files_cover_all_streams() {
        let files = required_prediction_files(Path::new("genome"));
        let kinds: Vec<&str> = files.iter().map(|(kind, _)| kind.as_str()).collect();
        assert_eq!(kinds, vec!["domain", "A", "AT", "KR", "DH", "ER", "T"]);
        assert_eq!(files[2].1, Path::new("genome").join("AT_predictions.json"));
    }

    #[test]
    fn test_check_required_files_reports_missing_kind() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_genome(dir.path());
        fs::remove_file(dir.path().join("DH_predictions.json")).unwrap();

        match check_required_files(dir.path()) {
            Err(ModulaError::MissingPrediction { kind, path }) => {
                assert_eq!(kind, "DH");
                assert!(path.ends_with("DH_predictions.json"));
            }
            other => panic!("Expected MissingPrediction, got {other:?}"),
        }
    }

    #[test]
    fn test_load_genome_predictions() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_genome(dir.path());
        fs::write(
            dir.path().join(DOMAIN_PREDICTIONS_FILE),
            r#"[{"protein_id": 7, "regions": [
                {"domain_id": 11, "label": "A", "score": 0.93, "protein_start": 5, "protein_stop": 410}
            ]}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("A_predictions.json"),
            r#"[{"query_id": 11, "predictions": [
                {"label": "Ser", "homology": 0.9, "rank": 1, "distance": 0.12}
            ]}]"#,
        )
        .unwrap();

        let predictions = load_genome_predictions(dir.path()).unwrap();
        assert_eq!(predictions.proteins.len(), 1);
        assert_eq!(predictions.proteins[0].regions[0].label, "A");
        assert_eq!(predictions.knn.len(), 6);
        let (target, queries) = &predictions.knn[0];
        assert_eq!(*target, KnnTarget::Adenylation);
        assert_eq!(queries[0].predictions[0].label, "Ser");
    }

    #[test]
    fn test_load_genome_predictions_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_genome(dir.path());
        fs::write(dir.path().join("T_predictions.json"), "{").unwrap();
        let result = load_genome_predictions(dir.path());
        assert!(matches!(result, Err(ModulaError::JsonError(_))));
    }
}
