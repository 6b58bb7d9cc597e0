use rustc_hash::FxHashSet;

use crate::constants::{CONDENSATION_PATCH_PAIRS, KETOSYNTHASE_PATCH_PAIRS, THIOLATION_PATCH_PAIRS};
use crate::types::{DomainLabel, DomainRecord};

/// Inserts `target` wherever a boundary pair lacks it.
///
/// Boundary-end domains are those whose label appears in any of
/// `boundary_pairs`. For every two consecutive boundary ends `i < j` whose
/// labels form one of the pairs, and whose span `domains[i..j]` has no domain
/// labelled like `target`, a copy of `target` is inserted right before `j`.
/// Insertions are keyed to distinct original indices, so they never collide.
///
/// # Examples
///
/// ```rust
/// use modula_core::module::patching::patch_module_boundaries;
/// use modula_core::types::{DomainLabel, DomainRecord};
///
/// let domains = vec![
///     DomainRecord::new(DomainLabel::Adenylation, 7, 0, 400),
///     DomainRecord::new(DomainLabel::Adenylation, 7, 500, 900),
/// ];
/// let patched = patch_module_boundaries(
///     &domains,
///     &[(DomainLabel::Adenylation, DomainLabel::Adenylation)],
///     &DomainRecord::synthetic(DomainLabel::Condensation),
/// );
/// assert_eq!(patched.len(), 3);
/// assert!(patched[1].insilico);
/// ```
pub fn patch_module_boundaries(
    domains: &[DomainRecord],
    boundary_pairs: &[(DomainLabel, DomainLabel)],
    target: &DomainRecord,
) -> Vec<DomainRecord> {
    let boundary_labels: FxHashSet<DomainLabel> = boundary_pairs
        .iter()
        .flat_map(|&(first, last)| [first, last])
        .collect();

    let boundary_ends: Vec<usize> = domains
        .iter()
        .enumerate()
        .filter(|(_, domain)| boundary_labels.contains(&domain.label))
        .map(|(idx, _)| idx)
        .collect();

    let insert_before: FxHashSet<usize> = boundary_ends
        .windows(2)
        .filter(|window| {
            let (first, last) = (window[0], window[1]);
            boundary_pairs.contains(&(domains[first].label, domains[last].label))
                && !domains[first..last]
                    .iter()
                    .any(|domain| domain.label == target.label)
        })
        .map(|window| window[1])
        .collect();

    let mut patched = Vec::with_capacity(domains.len() + insert_before.len());
    for (idx, domain) in domains.iter().enumerate() {
        if insert_before.contains(&idx) {
            patched.push(target.clone());
        }
        patched.push(domain.clone());
    }
    patched
}

/// Runs the fixed sequence of synthetic repairs on one protein's domains.
///
/// 1. Condensation domains between adenylation-driven modules, one pass over
///    all pairs.
/// 2. Ketosynthase domains, one pass per pair.
/// 3. Thiolation domains, one pass per pair, each re-scanning the output of
///    the previous pass.
pub fn patch_missing_domains(domains: &[DomainRecord]) -> Vec<DomainRecord> {
    let condensation = DomainRecord::synthetic(DomainLabel::Condensation);
    let mut patched = patch_module_boundaries(domains, CONDENSATION_PATCH_PAIRS, &condensation);

    let ketosynthase = DomainRecord::synthetic(DomainLabel::KetoSynthase);
    for pair in KETOSYNTHASE_PATCH_PAIRS {
        patched = patch_module_boundaries(&patched, std::slice::from_ref(pair), &ketosynthase);
    }

    let thiolation = DomainRecord::synthetic(DomainLabel::Thiolation);
    for pair in THIOLATION_PATCH_PAIRS {
        patched = patch_module_boundaries(&patched, std::slice::from_ref(pair), &thiolation);
    }

    patched
}
