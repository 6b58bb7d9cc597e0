//! Module calling: from an ordered domain list to annotated modules.
//!
//! The per-protein pipeline runs in three stages:
//!
//! 1. [`patching`] inserts synthetic C, KS and T domains where the domain
//!    grammar requires one the predictor missed.
//! 2. [`boundaries`] partitions the patched list into modules with a greedy
//!    scan over a table of valid transitions.
//! 3. Each [`Module`] classifies itself and resolves its chemical tags
//!    against a [`RuleTable`] via [`tags`].

pub mod boundaries;
pub mod patching;
pub mod tags;

use std::collections::BTreeSet;
use std::fmt;

use crate::results::ModuleReport;
use crate::rules::RuleTable;
use crate::types::{DomainLabel, DomainRecord, ModuleTag, ModuleType, Substrate};

pub use boundaries::detect_modules;
pub use patching::{patch_missing_domains, patch_module_boundaries};
pub use tags::resolve_tags;

/// A contiguous run of domains forming one biosynthetic step
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// 1-based position among the valid modules of the protein
    pub module_idx: usize,
    /// Member domains, synthetic ones included
    pub domains: Vec<DomainRecord>,
    /// Labels of the functional member domains
    pub annotations: BTreeSet<DomainLabel>,
    /// Substrate calls of all members, or malonyl for bare PKS modules
    pub substrates: Vec<Substrate>,
    /// Smallest start offset among positioned members
    pub module_start: Option<i64>,
    /// Largest stop offset among positioned members
    pub module_stop: Option<i64>,
    /// First non-null protein of the members
    pub protein_id: Option<i64>,
}

impl Module {
    pub fn new(module_idx: usize, domains: Vec<DomainRecord>) -> Self {
        let annotations: BTreeSet<DomainLabel> = domains
            .iter()
            .filter(|domain| domain.functional)
            .map(|domain| domain.label)
            .collect();

        let mut substrates: Vec<Substrate> = domains
            .iter()
            .flat_map(|domain| domain.substrates.iter().cloned())
            .collect();
        if substrates.is_empty()
            && contains_any(
                &annotations,
                &[DomainLabel::KetoSynthase, DomainLabel::AcylTransferase],
            )
        {
            substrates.push(Substrate::malonyl());
        }

        let module_start = domains.iter().filter_map(|domain| domain.start).min();
        let module_stop = domains.iter().filter_map(|domain| domain.stop).max();
        let protein_id = domains.iter().find_map(|domain| domain.protein_id);

        Self {
            module_idx,
            domains,
            annotations,
            substrates,
            module_start,
            module_stop,
            protein_id,
        }
    }

    /// Whether any of `labels` is among the functional annotations
    #[must_use]
    pub fn contains_any(&self, labels: &[DomainLabel]) -> bool {
        contains_any(&self.annotations, labels)
    }

    /// Classifies the module; the first matching rule wins:
    ///
    /// 1. KS → `pks`
    /// 2. A → `nrps`
    /// 3. KR, DH or ER → `pks`
    /// 4. first module with AT → `starter`
    /// 5. AT → `pks`
    /// 6. otherwise `other`
    #[must_use]
    pub fn module_type(&self) -> ModuleType {
        use DomainLabel::*;

        if self.contains_any(&[KetoSynthase]) {
            ModuleType::Pks
        } else if self.contains_any(&[Adenylation]) {
            ModuleType::Nrps
        } else if self.contains_any(&[KetoReductase, Dehydratase, EnoylReductase]) {
            ModuleType::Pks
        } else if self.module_idx == 1 && self.contains_any(&[AcylTransferase]) {
            ModuleType::Starter
        } else if self.contains_any(&[AcylTransferase]) {
            ModuleType::Pks
        } else {
            ModuleType::Other
        }
    }

    /// Only typed modules owned by a protein are reported
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.module_type() != ModuleType::Other && self.protein_id.is_some()
    }

    #[must_use]
    pub fn module_tags(&self, rules: &RuleTable) -> Vec<ModuleTag> {
        resolve_tags(self, rules)
    }

    /// Serializable summary; `None` for modules without an owning protein.
    #[must_use]
    pub fn report(&self, rules: &RuleTable) -> Option<ModuleReport> {
        let protein_id = self.protein_id?;
        Some(ModuleReport {
            protein_id,
            module_idx: self.module_idx,
            protein_start: self.module_start,
            protein_stop: self.module_stop,
            tags: self.module_tags(rules),
            domains: self
                .domains
                .iter()
                .filter_map(DomainRecord::domain_id)
                .collect(),
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.domains.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(" "))
    }
}

fn contains_any(annotations: &BTreeSet<DomainLabel>, labels: &[DomainLabel]) -> bool {
    labels.iter().any(|label| annotations.contains(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainLabel::*;

    fn module(module_idx: usize, labels: &[DomainLabel]) -> Module {
        let domains = labels
            .iter()
            .enumerate()
            .map(|(idx, &label)| {
                let start = 50 + idx as i64 * 100;
                DomainRecord::new(label, 42, start, start + 80)
            })
            .collect();
        Module::new(module_idx, domains)
    }

    #[test]
    fn test_module_type_ketosynthase_wins_over_adenylation() {
        assert_eq!(module(1, &[Adenylation, KetoSynthase]).module_type(), ModuleType::Pks);
        assert_eq!(module(3, &[KetoSynthase, Adenylation]).module_type(), ModuleType::Pks);
    }

    #[test]
    fn test_module_type_precedence_chain() {
        assert_eq!(
            module(2, &[Condensation, Adenylation, Thiolation]).module_type(),
            ModuleType::Nrps
        );
        assert_eq!(
            module(2, &[Dehydratase, Thiolation]).module_type(),
            ModuleType::Pks
        );
        assert_eq!(
            module(1, &[AcylTransferase, Thiolation]).module_type(),
            ModuleType::Starter
        );
        assert_eq!(
            module(2, &[AcylTransferase, Thiolation]).module_type(),
            ModuleType::Pks
        );
        assert_eq!(
            module(1, &[AcylTransferase, KetoReductase, Thiolation]).module_type(),
            ModuleType::Pks
        );
        assert_eq!(
            module(1, &[Condensation, Thiolation, ThioEsterase]).module_type(),
            ModuleType::Other
        );
    }

    #[test]
    fn test_inactive_domains_excluded_from_annotations() {
        let domains = vec![
            DomainRecord::new(KetoSynthase, 42, 0, 400),
            DomainRecord::new(AcylTransferase, 42, 500, 800),
            DomainRecord::new(KetoReductase, 42, 900, 1100).with_functional(false),
            DomainRecord::new(Thiolation, 42, 1200, 1270),
        ];
        let module = Module::new(1, domains);
        let expected: BTreeSet<_> = [KetoSynthase, AcylTransferase, Thiolation].into_iter().collect();
        assert_eq!(module.annotations, expected);
        assert_eq!(module.domains.len(), 4);
    }

    #[test]
    fn test_inactive_reductase_alone_is_other() {
        let domains = vec![
            DomainRecord::new(KetoReductase, 42, 0, 200).with_functional(false),
            DomainRecord::new(Thiolation, 42, 300, 370),
        ];
        assert_eq!(Module::new(2, domains).module_type(), ModuleType::Other);
    }

    #[test]
    fn test_malonyl_default_for_pks_without_substrates() {
        let module = module(1, &[KetoSynthase, AcylTransferase, Thiolation]);
        assert_eq!(module.substrates, vec![Substrate::new("Mal", 1)]);
    }

    #[test]
    fn test_no_malonyl_default_for_nrps() {
        let module = module(1, &[Condensation, Adenylation, Thiolation]);
        assert!(module.substrates.is_empty());
    }

    #[test]
    fn test_substrates_concatenate_members() {
        let domains = vec![
            DomainRecord::new(KetoSynthase, 42, 0, 400),
            DomainRecord::new(AcylTransferase, 42, 500, 800)
                .with_substrates(vec![Substrate::new("Mmal", 1), Substrate::new("Mal", 2)]),
            DomainRecord::new(Thiolation, 42, 900, 970),
        ];
        let module = Module::new(1, domains);
        assert_eq!(
            module.substrates,
            vec![Substrate::new("Mmal", 1), Substrate::new("Mal", 2)]
        );
    }

    #[test]
    fn test_span_and_protein_ignore_synthetic_domains() {
        let domains = vec![
            DomainRecord::synthetic(Condensation),
            DomainRecord::new(Adenylation, 9, 120, 520),
            DomainRecord::new(Thiolation, 9, 600, 670),
        ];
        let module = Module::new(1, domains);
        assert_eq!(module.module_start, Some(120));
        assert_eq!(module.module_stop, Some(670));
        assert_eq!(module.protein_id, Some(9));
        assert!(module.is_valid());
    }

    #[test]
    fn test_all_synthetic_module_is_invalid() {
        let module = Module::new(
            1,
            vec![
                DomainRecord::synthetic(KetoSynthase),
                DomainRecord::synthetic(Thiolation),
            ],
        );
        assert_eq!(module.module_type(), ModuleType::Pks);
        assert_eq!(module.protein_id, None);
        assert_eq!(module.module_start, None);
        assert!(!module.is_valid());
        assert!(module.report(&RuleTable::default()).is_none());
    }

    #[test]
    fn test_report_skips_synthetic_domain_ids() {
        let domains = vec![
            DomainRecord::synthetic(Condensation),
            DomainRecord::new(Adenylation, 9, 120, 520),
            DomainRecord::synthetic(Thiolation),
        ];
        let report = Module::new(2, domains)
            .report(&RuleTable::default())
            .unwrap();
        assert_eq!(report.protein_id, 9);
        assert_eq!(report.module_idx, 2);
        assert_eq!(report.domains, vec!["9_120_520".to_string()]);
        assert!(report.tags.is_empty());
    }

    #[test]
    fn test_display_layout() {
        let domains = vec![
            DomainRecord::synthetic(Condensation),
            DomainRecord::new(Adenylation, 9, 120, 520)
                .with_substrates(vec![Substrate::new("Thr", 1)]),
            DomainRecord::new(Thiolation, 9, 600, 670),
        ];
        assert_eq!(Module::new(1, domains).to_string(), "C(i) A(Thr) T");
    }
}
