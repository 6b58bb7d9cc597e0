use crate::types::DomainLabel::{self, *};

// =============================================================================
// Upstream filtering
// =============================================================================

/// Default minimum domain predictor score for a region to be kept
pub const DEFAULT_MIN_DOMAIN_SCORE: f64 = 0.5;

/// Default minimum homology for an `inactive` k-NN call to mark a domain non-functional
pub const DEFAULT_MIN_FUNCTIONAL_SCORE: f64 = 0.6;

/// Default minimum homology for a `B` k-NN call to set the T domain subclass
pub const DEFAULT_MIN_SUBCLASS_SCORE: f64 = 0.6;

/// k-NN label marking a KR/DH/ER domain as catalytically inactive
pub const INACTIVE_LABEL: &str = "inactive";

/// k-NN label of the B-type thiolation subclass
pub const SUBCLASS_B_LABEL: &str = "B";

/// Raw labels preceding a T domain that rescue it regardless of score
pub const T_RESCUE_PREDECESSORS: &[&str] = &["KS", "AT", "KR"];

/// Raw labels following a leading A domain that rescue it below threshold
pub const A_STARTER_SUCCESSORS: &[&str] = &["T", "C", "KR"];

/// Raw labels preceding an A domain that rescue it below threshold
pub const A_RESCUE_PREDECESSORS: &[&str] = &["C", "KR"];

// =============================================================================
// Synthetic domain patching
// =============================================================================

/// Pairs between which a missing condensation domain is inserted (single pass)
pub const CONDENSATION_PATCH_PAIRS: &[(DomainLabel, DomainLabel)] = &[
    (Adenylation, Adenylation),
    (KetoSynthase, Adenylation),
    (AcylTransferase, Adenylation),
];

/// Pairs between which a missing ketosynthase domain is inserted (one pass each)
pub const KETOSYNTHASE_PATCH_PAIRS: &[(DomainLabel, DomainLabel)] = &[
    (KetoReductase, AcylTransferase),
    (PyranSynthase, AcylTransferase),
    (Thiolation, AcylTransferase),
];

/// Pairs between which a missing thiolation domain is inserted (one pass each)
pub const THIOLATION_PATCH_PAIRS: &[(DomainLabel, DomainLabel)] = &[
    (Adenylation, Condensation),
    (KetoReductase, KetoSynthase),
    (AcylTransferase, KetoSynthase),
    (KetoSynthase, KetoSynthase),
    (AcylTransferase, AcylTransferase),
];

// =============================================================================
// Module boundary detection
// =============================================================================

/// Domains that can open or close a module
pub const BOUNDARY_END_LABELS: &[DomainLabel] =
    &[Condensation, KetoSynthase, AcylTransferase, Adenylation];

/// Ordered table of valid (module start, next module start) transitions
pub const MODULE_TRANSITIONS: &[(DomainLabel, DomainLabel)] = &[
    (Condensation, KetoSynthase),
    (Condensation, AcylTransferase),
    (Condensation, Condensation),
    (KetoSynthase, KetoSynthase),
    (AcylTransferase, AcylTransferase),
    (KetoSynthase, Condensation),
    (AcylTransferase, Condensation),
    (AcylTransferase, KetoSynthase),
    (Adenylation, KetoSynthase),
    (Adenylation, Condensation),
    (Adenylation, AcylTransferase),
    (Adenylation, Adenylation),
];

/// Tailoring domains whose presence before the first KS marks a truncated PKS module
pub const PARTIAL_PKS_LABELS: &[DomainLabel] = &[KetoReductase, Dehydratase, EnoylReductase];

// =============================================================================
// Tag resolution
// =============================================================================

/// Substrate assumed for PKS modules without substrate calls
pub const MALONYL_SUBSTRATE: &str = "Mal";

/// Placeholder replaced by the substrate label in rule formulas
pub const SUBSTRATE_PLACEHOLDER: &str = "{substrate}";

/// Formatted tags known to be artifacts of the rule table
pub const EXCLUDED_TAGS: &[&str] = &["Butyl-DH | TE", "Butyl-DH"];

// =============================================================================
// Genome directory layout
// =============================================================================

/// Domain region predictions for every protein of a genome
pub const DOMAIN_PREDICTIONS_FILE: &str = "domain_predictions.json";

/// Output file holding the called modules of a genome
pub const MODULE_PREDICTIONS_FILE: &str = "module_predictions.json";

/// Output file holding upload-ready module records
pub const MODULE_UPLOAD_FILE: &str = "module_upload.json";
