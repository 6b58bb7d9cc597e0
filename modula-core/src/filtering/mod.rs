//! Confidence and context filtering of raw domain calls.
//!
//! The domain predictor emits every region it sees; only confident regions,
//! plus a few low-scoring ones rescued by their neighbours, become
//! [`DomainRecord`]s for module calling.

pub mod knn;

use tracing::trace;

use crate::constants::{A_RESCUE_PREDECESSORS, A_STARTER_SUCCESSORS, T_RESCUE_PREDECESSORS};
use crate::predictions::{DomainRegion, ProteinRegions};
use crate::types::{DomainLabel, DomainRecord};
use knn::KnnLookup;

/// Decides whether the region at `idx` survives filtering.
///
/// - Regions scoring at least `min_domain_score` are kept.
/// - `T` is kept whenever the preceding region is KS, AT or KR.
/// - `TE` is kept if and only if it is the last region.
/// - A low-scoring `A` is kept when it leads the protein and is followed by
///   T, C or KR, or when it follows C or KR.
pub fn keep_region(regions: &[DomainRegion], idx: usize, min_domain_score: f64) -> bool {
    let region = &regions[idx];
    let previous = idx.checked_sub(1).map(|prev| regions[prev].label.as_str());
    let next = regions.get(idx + 1).map(|r| r.label.as_str());
    let is_last = idx + 1 == regions.len();

    let mut keep = region.score >= min_domain_score;

    match region.label.as_str() {
        "T" => {
            if previous.is_some_and(|label| T_RESCUE_PREDECESSORS.contains(&label)) {
                keep = true;
            }
        }
        "TE" => keep = is_last,
        "A" if !keep => {
            keep = if idx == 0 {
                next.is_some_and(|label| A_STARTER_SUCCESSORS.contains(&label))
            } else {
                previous.is_some_and(|label| A_RESCUE_PREDECESSORS.contains(&label))
            };
        }
        _ => {}
    }

    keep
}

/// Filters one protein's regions into enriched domain records.
///
/// Regions whose label lies outside the domain vocabulary are dropped after
/// filtering; they still count as neighbours for the context rules.
pub fn filter_domains(
    protein: &ProteinRegions,
    lookup: &KnnLookup,
    min_domain_score: f64,
) -> Vec<DomainRecord> {
    let regions = &protein.regions;
    (0..regions.len())
        .filter(|&idx| keep_region(regions, idx, min_domain_score))
        .filter_map(|idx| {
            let region = &regions[idx];
            let Some(label) = DomainLabel::from_code(&region.label) else {
                trace!(
                    protein_id = protein.protein_id,
                    label = %region.label,
                    "Ignoring domain outside module vocabulary"
                );
                return None;
            };
            let record = DomainRecord::new(
                label,
                protein.protein_id,
                region.protein_start,
                region.protein_stop,
            );
            Some(lookup.enrich(record, region.domain_id))
        })
        .collect()
}
