use crate::constants::{BOUNDARY_END_LABELS, MODULE_TRANSITIONS, PARTIAL_PKS_LABELS};
use crate::module::Module;
use crate::types::{DomainLabel, DomainRecord};

/// Indices of functional domains that can open or close a module
fn boundary_end_indices(domains: &[DomainRecord]) -> Vec<usize> {
    domains
        .iter()
        .enumerate()
        .filter(|(_, domain)| domain.functional && BOUNDARY_END_LABELS.contains(&domain.label))
        .map(|(idx, _)| idx)
        .collect()
}

fn is_transition(first: DomainLabel, last: DomainLabel) -> bool {
    MODULE_TRANSITIONS.contains(&(first, last))
}

/// Computes the module start positions of a patched domain list.
///
/// The returned vector starts with `0` and ends with `domains.len()`; each
/// consecutive pair delimits one candidate module.
///
/// The scan is greedy and never backtracks. A cursor walks the boundary-end
/// positions; from each start it accepts the first later boundary end that
/// forms a valid transition and resumes from there, skipping everything it
/// passed over. A different choice could occasionally split modules better,
/// but this leftmost match is the reference behaviour.
pub fn module_boundaries(domains: &[DomainRecord]) -> Vec<usize> {
    let boundary_ends = boundary_end_indices(domains);
    let mut boundaries = vec![0];

    if let [only] = boundary_ends.as_slice() {
        if *only != 0 {
            boundaries.push(*only);
        }
    }

    let mut cursor = 0;
    let mut idx = 0;
    while idx + 1 < boundary_ends.len() {
        if idx < cursor {
            idx += 1;
            continue;
        }
        let first = domains[boundary_ends[idx]].label;
        let next = (idx + 1..boundary_ends.len())
            .find(|&later| is_transition(first, domains[boundary_ends[later]].label));
        if let Some(later) = next {
            boundaries.push(boundary_ends[later]);
            cursor = later;
        }
        idx += 1;
    }

    // Without any boundary, a KS preceded by tailoring domains marks a PKS
    // module truncated before its ketosynthase
    if boundaries.len() == 1 {
        if let Some(ks_pos) = domains
            .iter()
            .position(|domain| domain.label == DomainLabel::KetoSynthase)
        {
            let tailoring_first = domains[..ks_pos]
                .iter()
                .any(|domain| PARTIAL_PKS_LABELS.contains(&domain.label));
            if tailoring_first {
                boundaries.push(ks_pos);
            }
        }
    }

    boundaries.push(domains.len());
    boundaries
}

/// Partitions a patched domain list into valid, numbered modules.
///
/// Empty slices are skipped. Modules typed `other` or without an owning
/// protein are dropped silently and do not consume a module number.
pub fn detect_modules(domains: &[DomainRecord]) -> Vec<Module> {
    let boundaries = module_boundaries(domains);
    let mut modules = Vec::new();
    let mut module_idx = 1;

    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start >= end {
            continue;
        }
        let module = Module::new(module_idx, domains[start..end].to_vec());
        if module.is_valid() {
            modules.push(module);
            module_idx += 1;
        }
    }

    modules
}
