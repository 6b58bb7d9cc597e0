use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalytic and carrier domain types considered by the module caller.
///
/// Raw predictor labels outside this vocabulary never reach module calling.
///
/// # Examples
///
/// ```rust
/// use modula_core::types::DomainLabel;
///
/// let label: DomainLabel = "KS".parse()?;
/// assert_eq!(label, DomainLabel::KetoSynthase);
/// assert_eq!(label.as_str(), "KS");
/// # Ok::<(), modula_core::types::ModulaError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DomainLabel {
    /// Thiolation (peptidyl/acyl carrier protein) domain
    #[serde(rename = "T")]
    Thiolation,
    /// Thioesterase release domain
    #[serde(rename = "TE")]
    ThioEsterase,
    /// Condensation domain
    #[serde(rename = "C")]
    Condensation,
    /// Adenylation domain
    #[serde(rename = "A")]
    Adenylation,
    /// Acyltransferase domain
    #[serde(rename = "AT")]
    AcylTransferase,
    /// Ketosynthase domain
    #[serde(rename = "KS")]
    KetoSynthase,
    /// Ketoreductase domain
    #[serde(rename = "KR")]
    KetoReductase,
    /// Dehydratase domain
    #[serde(rename = "DH")]
    Dehydratase,
    /// Enoylreductase domain
    #[serde(rename = "ER")]
    EnoylReductase,
    /// Pyran synthase domain
    #[serde(rename = "PS")]
    PyranSynthase,
    /// O-methyltransferase domain
    #[serde(rename = "OMT")]
    OMethylTransferase,
    /// N-methyltransferase domain
    #[serde(rename = "NMT")]
    NMethylTransferase,
    /// C-methyltransferase domain
    #[serde(rename = "CMT")]
    CMethylTransferase,
}

impl DomainLabel {
    /// Every label of the vocabulary, in canonical order.
    pub const ALL: [Self; 13] = [
        Self::Thiolation,
        Self::ThioEsterase,
        Self::Condensation,
        Self::Adenylation,
        Self::AcylTransferase,
        Self::KetoSynthase,
        Self::KetoReductase,
        Self::Dehydratase,
        Self::EnoylReductase,
        Self::PyranSynthase,
        Self::OMethylTransferase,
        Self::NMethylTransferase,
        Self::CMethylTransferase,
    ];

    /// Short code used by the domain predictor and in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thiolation => "T",
            Self::ThioEsterase => "TE",
            Self::Condensation => "C",
            Self::Adenylation => "A",
            Self::AcylTransferase => "AT",
            Self::KetoSynthase => "KS",
            Self::KetoReductase => "KR",
            Self::Dehydratase => "DH",
            Self::EnoylReductase => "ER",
            Self::PyranSynthase => "PS",
            Self::OMethylTransferase => "OMT",
            Self::NMethylTransferase => "NMT",
            Self::CMethylTransferase => "CMT",
        }
    }

    /// Parses a raw predictor label, returning `None` outside the vocabulary.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == code)
    }
}

impl fmt::Display for DomainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainLabel {
    type Err = ModulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ModulaError::InvalidDomainLabel(s.to_string()))
    }
}

/// A ranked substrate call for an adenylation or acyltransferase domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substrate {
    /// Substrate abbreviation (e.g. `Mal`, `Mmal`, `Ser`)
    pub label: String,
    /// 1-based rank, 1 being the most confident call
    pub rank: u32,
}

impl Substrate {
    pub fn new(label: impl Into<String>, rank: u32) -> Self {
        Self {
            label: label.into(),
            rank,
        }
    }

    /// Malonyl-CoA, the default extender unit of PKS modules
    #[must_use]
    pub fn malonyl() -> Self {
        Self::new(crate::constants::MALONYL_SUBSTRATE, 1)
    }
}

/// One catalytic or carrier domain call within a protein.
///
/// Domains inserted by the synthetic patcher carry `insilico = true` and have
/// no protein or position, so they never receive a [`domain_id`](Self::domain_id).
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    /// Domain type
    pub label: DomainLabel,
    /// Owning protein, `None` for synthetic domains
    pub protein_id: Option<i64>,
    /// Residue offset where the domain begins
    pub start: Option<i64>,
    /// Residue offset where the domain ends
    pub stop: Option<i64>,
    /// Ranked substrate calls (A and AT domains only)
    pub substrates: Vec<Substrate>,
    /// Whether the domain is catalytically active
    pub functional: bool,
    /// Domain subclass, currently only `"B"` for T domains
    pub subclass: Option<String>,
    /// Whether the domain was inserted rather than predicted
    pub insilico: bool,
}

impl DomainRecord {
    /// Creates a predicted, functional domain without enrichment
    pub const fn new(label: DomainLabel, protein_id: i64, start: i64, stop: i64) -> Self {
        Self {
            label,
            protein_id: Some(protein_id),
            start: Some(start),
            stop: Some(stop),
            substrates: Vec::new(),
            functional: true,
            subclass: None,
            insilico: false,
        }
    }

    /// Creates a synthetic marker domain used to repair missing boundaries
    pub const fn synthetic(label: DomainLabel) -> Self {
        Self {
            label,
            protein_id: None,
            start: None,
            stop: None,
            substrates: Vec::new(),
            functional: true,
            subclass: None,
            insilico: true,
        }
    }

    #[must_use]
    pub fn with_substrates(mut self, substrates: Vec<Substrate>) -> Self {
        self.substrates = substrates;
        self
    }

    #[must_use]
    pub fn with_functional(mut self, functional: bool) -> Self {
        self.functional = functional;
        self
    }

    #[must_use]
    pub fn with_subclass(mut self, subclass: Option<String>) -> Self {
        self.subclass = subclass;
        self
    }

    /// Composite key `{protein_id}_{start}_{stop}`, `None` for synthetic domains
    #[must_use]
    pub fn domain_id(&self) -> Option<String> {
        if self.insilico {
            return None;
        }
        match (self.protein_id, self.start, self.stop) {
            (Some(protein_id), Some(start), Some(stop)) => {
                Some(format!("{protein_id}_{start}_{stop}"))
            }
            _ => None,
        }
    }
}

impl fmt::Display for DomainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.insilico {
            return write!(f, "{}(i)", self.label);
        }
        if !self.functional {
            return write!(f, "{}0", self.label);
        }
        match (self.substrates.first(), &self.subclass) {
            (Some(substrate), _) => write!(f, "{}({})", self.label, substrate.label),
            (None, Some(subclass)) => write!(f, "{}({})", self.label, subclass),
            (None, None) => write!(f, "{}", self.label),
        }
    }
}

/// Biosynthetic family of a called module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// Polyketide synthase extension module
    Pks,
    /// Non-ribosomal peptide synthetase module
    Nrps,
    /// PKS loading module (leading AT without KS)
    Starter,
    /// Anything else; never reported
    Other,
}

impl ModuleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pks => "pks",
            Self::Nrps => "nrps",
            Self::Starter => "starter",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleType {
    type Err = ModulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pks" => Ok(Self::Pks),
            "nrps" => Ok(Self::Nrps),
            "starter" => Ok(Self::Starter),
            "other" => Ok(Self::Other),
            _ => Err(ModulaError::InvalidModuleType(s.to_string())),
        }
    }
}

/// A chemical tag assigned to a module, ranked like the substrate it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTag {
    pub tag: String,
    pub rank: u32,
}

/// Error types that can occur during module calling
#[derive(Error, Debug)]
pub enum ModulaError {
    /// A required upstream prediction file is absent
    #[error("Missing {kind} predictions: {}", path.display())]
    MissingPrediction { kind: String, path: PathBuf },
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Malformed JSON input or failed serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Characterization rule table failed validation
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),
    /// Label outside the domain vocabulary
    #[error("Invalid domain label: {0}")]
    InvalidDomainLabel(String),
    /// Unknown module type name
    #[error("Invalid module type: {0}")]
    InvalidModuleType(String),
}
