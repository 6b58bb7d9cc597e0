use rustc_hash::FxHashMap;

use crate::config::ModulaConfig;
use crate::constants::{INACTIVE_LABEL, SUBCLASS_B_LABEL};
use crate::predictions::KnnQuery;
use crate::types::{DomainLabel, DomainRecord, Substrate};

/// Domain types with a k-NN classification stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnnTarget {
    /// Substrate calls for A domains
    Adenylation,
    /// Substrate calls for AT domains
    AcylTransferase,
    /// Functional/inactive calls for KR domains
    KetoReductase,
    /// Functional/inactive calls for DH domains
    Dehydratase,
    /// Functional/inactive calls for ER domains
    EnoylReductase,
    /// Subclass calls for T domains
    Thiolation,
}

impl KnnTarget {
    pub const ALL: [Self; 6] = [
        Self::Adenylation,
        Self::AcylTransferase,
        Self::KetoReductase,
        Self::Dehydratase,
        Self::EnoylReductase,
        Self::Thiolation,
    ];

    #[must_use]
    pub const fn label(self) -> DomainLabel {
        match self {
            Self::Adenylation => DomainLabel::Adenylation,
            Self::AcylTransferase => DomainLabel::AcylTransferase,
            Self::KetoReductase => DomainLabel::KetoReductase,
            Self::Dehydratase => DomainLabel::Dehydratase,
            Self::EnoylReductase => DomainLabel::EnoylReductase,
            Self::Thiolation => DomainLabel::Thiolation,
        }
    }

    /// Name of the prediction file, e.g. `KR_predictions.json`
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}_predictions.json", self.label())
    }
}

/// Per-domain annotations derived from k-NN results.
///
/// Queries without predictions are not recorded, so the corresponding domains
/// fall back to the defaults: no substrates, functional, no subclass.
#[derive(Debug, Clone, Default)]
pub struct KnnLookup {
    substrates: FxHashMap<(DomainLabel, i64), Vec<Substrate>>,
    functional: FxHashMap<(DomainLabel, i64), bool>,
    subclass: FxHashMap<i64, Option<String>>,
}

impl KnnLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup from every stream of a genome
    pub fn from_streams(streams: &[(KnnTarget, Vec<KnnQuery>)], config: &ModulaConfig) -> Self {
        let mut lookup = Self::new();
        for (target, queries) in streams {
            lookup.add_queries(*target, queries, config);
        }
        lookup
    }

    /// Records the calls of one stream.
    ///
    /// - A/AT: every prediction becomes a ranked substrate.
    /// - KR/DH/ER: inactive only when the top hit is `inactive` with homology
    ///   at least `min_functional_score`.
    /// - T: subclass `B` only when the top hit is `B` with homology at least
    ///   `min_subclass_score`.
    pub fn add_queries(&mut self, target: KnnTarget, queries: &[KnnQuery], config: &ModulaConfig) {
        let label = target.label();
        for query in queries {
            let Some(best) = query.predictions.first() else {
                continue;
            };
            match target {
                KnnTarget::Adenylation | KnnTarget::AcylTransferase => {
                    let substrates = query
                        .predictions
                        .iter()
                        .map(|p| Substrate::new(p.label.clone(), p.rank))
                        .collect();
                    self.substrates.insert((label, query.query_id), substrates);
                }
                KnnTarget::KetoReductase | KnnTarget::Dehydratase | KnnTarget::EnoylReductase => {
                    let inactive = best.label == INACTIVE_LABEL
                        && best.homology >= config.min_functional_score;
                    self.functional.insert((label, query.query_id), !inactive);
                }
                KnnTarget::Thiolation => {
                    let subclass = (best.label == SUBCLASS_B_LABEL
                        && best.homology >= config.min_subclass_score)
                        .then(|| SUBCLASS_B_LABEL.to_string());
                    self.subclass.insert(query.query_id, subclass);
                }
            }
        }
    }

    pub fn substrates(&self, label: DomainLabel, domain_id: i64) -> Vec<Substrate> {
        self.substrates
            .get(&(label, domain_id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn functional(&self, label: DomainLabel, domain_id: i64) -> bool {
        self.functional
            .get(&(label, domain_id))
            .copied()
            .unwrap_or(true)
    }

    pub fn subclass(&self, domain_id: i64) -> Option<String> {
        self.subclass.get(&domain_id).cloned().flatten()
    }

    /// Attaches the annotation relevant to the record's label
    pub fn enrich(&self, record: DomainRecord, domain_id: i64) -> DomainRecord {
        match record.label {
            DomainLabel::Adenylation | DomainLabel::AcylTransferase => {
                let substrates = self.substrates(record.label, domain_id);
                record.with_substrates(substrates)
            }
            DomainLabel::KetoReductase | DomainLabel::Dehydratase | DomainLabel::EnoylReductase => {
                let functional = self.functional(record.label, domain_id);
                record.with_functional(functional)
            }
            DomainLabel::Thiolation => {
                let subclass = self.subclass(domain_id);
                record.with_subclass(subclass)
            }
            _ => record,
        }
    }
}
