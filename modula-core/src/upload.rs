//! Graph-ready module records.
//!
//! Module reports name their tags by chemical formula; the knowledge graph
//! keys tags by id. [`prepare_upload_records`] resolves tag names through a
//! [`TagLookup`] and links each module to its neighbours on the same protein.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::results::{ModuleReport, ProteinModules};
use crate::types::ModulaError;

/// One row of the tag lookup file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub tag_id: String,
}

/// Tag name to tag id mapping.
///
/// # Examples
///
/// ```rust
/// use modula_core::upload::TagLookup;
///
/// let lookup = TagLookup::from_json_str(r#"[{"name": "Mal", "tag_id": "t-17"}]"#)?;
/// assert_eq!(lookup.get("Mal"), Some("t-17"));
/// assert_eq!(lookup.get("Mmal"), None);
/// # Ok::<(), modula_core::types::ModulaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagLookup {
    ids: FxHashMap<String, String>,
}

impl TagLookup {
    /// Parses a JSON array of `{name, tag_id}` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::JsonError`] if the content is not such an array.
    pub fn from_json_str(content: &str) -> Result<Self, ModulaError> {
        let entries: Vec<TagEntry> = serde_json::from_str(content)?;
        Ok(entries.into_iter().collect())
    }

    /// Reads a tag lookup file.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::IoError`] if the file cannot be read and
    /// [`ModulaError::JsonError`] if it is malformed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModulaError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<TagEntry> for TagLookup {
    fn from_iter<I: IntoIterator<Item = TagEntry>>(iter: I) -> Self {
        Self {
            ids: iter
                .into_iter()
                .map(|entry| (entry.name, entry.tag_id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTag {
    pub tag_id: String,
    pub rank: u32,
}

/// A module as written to `module_upload.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUploadRecord {
    pub module_id: String,
    pub protein_start: Option<i64>,
    pub protein_stop: Option<i64>,
    /// ORFs the module lies on; modules never span proteins, so this is
    /// the owning protein alone
    pub orfs: Vec<String>,
    pub domains: Vec<String>,
    pub tags: Vec<UploadTag>,
    /// Ids of the previous and next module on the same protein
    pub adjacency_modules: Vec<String>,
}

/// Graph key of a module, `{protein_id}_{module_idx}`
pub fn module_id(protein_id: i64, module_idx: usize) -> String {
    format!("{protein_id}_{module_idx}")
}

/// Converts a genome's module reports into upload records.
///
/// Tags missing from `lookup` are dropped with a warning.
pub fn prepare_upload_records(
    proteins: &[ProteinModules],
    lookup: &TagLookup,
) -> Vec<ModuleUploadRecord> {
    let mut records = Vec::new();
    for protein in proteins {
        let modules = &protein.modules;
        for (pos, report) in modules.iter().enumerate() {
            let adjacency_modules = [pos.checked_sub(1), Some(pos + 1)]
                .into_iter()
                .flatten()
                .filter_map(|neighbour| modules.get(neighbour))
                .map(|other| module_id(other.protein_id, other.module_idx))
                .collect();
            records.push(ModuleUploadRecord {
                module_id: module_id(report.protein_id, report.module_idx),
                protein_start: report.protein_start,
                protein_stop: report.protein_stop,
                orfs: vec![report.protein_id.to_string()],
                domains: report.domains.clone(),
                tags: upload_tags(report, lookup),
                adjacency_modules,
            });
        }
    }
    records
}

fn upload_tags(report: &ModuleReport, lookup: &TagLookup) -> Vec<UploadTag> {
    report
        .tags
        .iter()
        .filter_map(|tag| match lookup.get(&tag.tag) {
            Some(tag_id) => Some(UploadTag {
                tag_id: tag_id.to_string(),
                rank: tag.rank,
            }),
            None => {
                warn!(
                    tag = %tag.tag,
                    module = %module_id(report.protein_id, report.module_idx),
                    "Dropping tag missing from lookup"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModuleTag;

    fn report(protein_id: i64, module_idx: usize, tags: &[&str]) -> ModuleReport {
        ModuleReport {
            protein_id,
            module_idx,
            protein_start: Some(module_idx as i64 * 1000),
            protein_stop: Some(module_idx as i64 * 1000 + 900),
            tags: tags
                .iter()
                .enumerate()
                .map(|(idx, tag)| ModuleTag {
                    tag: tag.to_string(),
                    rank: idx as u32 + 1,
                })
                .collect(),
            domains: vec![format!("{protein_id}_{}_{}", module_idx * 1000, module_idx * 1000 + 400)],
        }
    }

    fn lookup() -> TagLookup {
        TagLookup::from_json_str(
            r#"[
                {"name": "Mal", "tag_id": "1"},
                {"name": "Mmal", "tag_id": "2"},
                {"name": "Starter-Mal", "tag_id": "3"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_module_ids_and_adjacency() {
        let proteins = vec![
            ProteinModules {
                protein_id: 7,
                modules: vec![report(7, 1, &["Starter-Mal"]), report(7, 2, &["Mal"]), report(7, 3, &["Mmal"])],
            },
            ProteinModules {
                protein_id: 8,
                modules: vec![report(8, 1, &["Mal"])],
            },
        ];
        let records = prepare_upload_records(&proteins, &lookup());

        let ids: Vec<&str> = records.iter().map(|r| r.module_id.as_str()).collect();
        assert_eq!(ids, vec!["7_1", "7_2", "7_3", "8_1"]);
        assert_eq!(records[0].adjacency_modules, vec!["7_2"]);
        assert_eq!(records[1].adjacency_modules, vec!["7_1", "7_3"]);
        assert_eq!(records[2].adjacency_modules, vec!["7_2"]);
        // Adjacency never crosses proteins
        assert!(records[3].adjacency_modules.is_empty());
        assert_eq!(records[1].protein_start, Some(2000));
        assert_eq!(records[1].domains, vec!["7_2000_2400"]);
        assert_eq!(records[1].orfs, vec!["7"]);
        assert_eq!(records[3].orfs, vec!["8"]);
    }

    #[test]
    fn test_unmapped_tags_dropped() {
        let proteins = vec![ProteinModules {
            protein_id: 3,
            modules: vec![report(3, 1, &["Mmal", "Unknown-ER", "Mal"])],
        }];
        let records = prepare_upload_records(&proteins, &lookup());
        assert_eq!(
            records[0].tags,
            vec![
                UploadTag {
                    tag_id: "2".to_string(),
                    rank: 1
                },
                UploadTag {
                    tag_id: "1".to_string(),
                    rank: 3
                },
            ]
        );
    }

    #[test]
    fn test_lookup_rejects_malformed_json() {
        assert!(matches!(
            TagLookup::from_json_str(r#"{"Mal": 1}"#),
            Err(ModulaError::JsonError(_))
        ));
        assert!(TagLookup::from_json_str("[]").unwrap().is_empty());
    }

    #[test]
    fn test_lookup_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module_tags.json");
        fs::write(&path, r#"[{"name": "Mal", "tag_id": "1"}]"#).unwrap();
        assert_eq!(TagLookup::from_json_file(&path).unwrap().get("Mal"), Some("1"));

        assert!(matches!(
            TagLookup::from_json_file(dir.path().join("absent.json")),
            Err(ModulaError::IoError(_))
        ));
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            TagLookup::from_json_file(&path),
            Err(ModulaError::JsonError(_))
        ));
    }
}
