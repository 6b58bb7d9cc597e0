//! Characterization rules mapping module composition to chemical tags.
//!
//! A [`RuleTable`] is loaded once and handed to the tag resolver by
//! reference. Each rule names the functional domains a module must contain,
//! the module type it applies to, a formula with a `{substrate}` placeholder
//! and a priority used to pick among several matching rules.
//!
//! ```rust
//! use modula_core::rules::RuleTable;
//!
//! let rules = RuleTable::bundled()?;
//! assert!(!rules.is_empty());
//! # Ok::<(), modula_core::types::ModulaError>(())
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::SUBSTRATE_PLACEHOLDER;
use crate::types::{DomainLabel, ModulaError, ModuleType};

const BUNDLED_CHARACTERIZATIONS: &str = include_str!("../data/characterizations.json");

/// A single characterization rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterizationRule {
    /// Functional domains the module must contain
    pub annotations: BTreeSet<DomainLabel>,
    /// Module type the rule applies to
    pub module_type: ModuleType,
    /// Tag template containing `{substrate}`
    pub formula: String,
    /// Higher wins when several rules match
    pub priority: i64,
}

impl CharacterizationRule {
    /// Whether the rule applies to a module with these annotations and type
    #[must_use]
    pub fn matches(&self, annotations: &BTreeSet<DomainLabel>, module_type: ModuleType) -> bool {
        self.module_type == module_type && self.annotations.is_subset(annotations)
    }

    /// Fills the formula placeholder with a substrate label
    #[must_use]
    pub fn format(&self, substrate: &str) -> String {
        self.formula.replace(SUBSTRATE_PLACEHOLDER, substrate)
    }
}

#[derive(Debug, Deserialize)]
struct RawRule {
    annotations: Vec<String>,
    module_type: String,
    formula: String,
    priority: i64,
}

impl TryFrom<RawRule> for CharacterizationRule {
    type Error = ModulaError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let annotations = raw
            .annotations
            .iter()
            .map(|code| {
                DomainLabel::from_code(code).ok_or_else(|| {
                    ModulaError::InvalidRuleTable(format!(
                        "unknown domain label `{code}` in rule `{}`",
                        raw.formula
                    ))
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        let module_type: ModuleType = raw.module_type.parse().map_err(|_| {
            ModulaError::InvalidRuleTable(format!(
                "unknown module type `{}` in rule `{}`",
                raw.module_type, raw.formula
            ))
        })?;
        if !raw.formula.contains(SUBSTRATE_PLACEHOLDER) {
            return Err(ModulaError::InvalidRuleTable(format!(
                "formula `{}` has no {SUBSTRATE_PLACEHOLDER} placeholder",
                raw.formula
            )));
        }
        Ok(Self {
            annotations,
            module_type,
            formula: raw.formula,
            priority: raw.priority,
        })
    }
}

/// Immutable table of characterization rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CharacterizationRule>,
}

impl RuleTable {
    pub const fn new(rules: Vec<CharacterizationRule>) -> Self {
        Self { rules }
    }

    /// The rule table shipped with the crate
    pub fn bundled() -> Result<Self, ModulaError> {
        Self::from_json_str(BUNDLED_CHARACTERIZATIONS)
    }

    /// Loads and validates a JSON array of rules.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::JsonError`] for malformed JSON and
    /// [`ModulaError::InvalidRuleTable`] for unknown labels, unknown module
    /// types or formulas without a placeholder.
    pub fn from_json_str(content: &str) -> Result<Self, ModulaError> {
        let raw: Vec<RawRule> = serde_json::from_str(content)?;
        let rules = raw
            .into_iter()
            .map(CharacterizationRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Reads and validates a rule file.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::IoError`] if the file cannot be read, otherwise
    /// the errors of [`RuleTable::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModulaError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn rules(&self) -> &[CharacterizationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Highest-priority matching rule; the earliest rule wins a tie.
    pub fn best_match(
        &self,
        annotations: &BTreeSet<DomainLabel>,
        module_type: ModuleType,
    ) -> Option<&CharacterizationRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(annotations, module_type))
            .fold(None, |best: Option<&CharacterizationRule>, rule| match best {
                Some(current) if current.priority >= rule.priority => Some(current),
                _ => Some(rule),
            })
    }
}
