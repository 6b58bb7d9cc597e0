#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;

pub const KNN_FILES: &[&str] = &[
    "A_predictions.json",
    "AT_predictions.json",
    "KR_predictions.json",
    "DH_predictions.json",
    "ER_predictions.json",
    "T_predictions.json",
];

/// An NRPS protein (7) with a rescued A and a terminal TE, and a PKS protein
/// (42) with an inactive KR. Protein 9 has no regions.
pub const DOMAIN_PREDICTIONS: &str = r#"[
  {"protein_id": 7, "regions": [
    {"domain_id": 10, "label": "A", "score": 0.9, "protein_start": 0, "protein_stop": 400},
    {"domain_id": 11, "label": "T", "score": 0.9, "protein_start": 450, "protein_stop": 520},
    {"domain_id": 12, "label": "C", "score": 0.9, "protein_start": 600, "protein_stop": 900},
    {"domain_id": 13, "label": "A", "score": 0.35, "protein_start": 950, "protein_stop": 1350},
    {"domain_id": 14, "label": "T", "score": 0.2, "protein_start": 1400, "protein_stop": 1470},
    {"domain_id": 15, "label": "TE", "score": 0.9, "protein_start": 1500, "protein_stop": 1750}
  ]},
  {"protein_id": 9, "regions": []},
  {"protein_id": 42, "regions": [
    {"domain_id": 1, "label": "KS", "score": 0.9, "protein_start": 10, "protein_stop": 430},
    {"domain_id": 2, "label": "AT", "score": 0.8, "protein_start": 540, "protein_stop": 850},
    {"domain_id": 3, "label": "KR", "score": 0.9, "protein_start": 1100, "protein_stop": 1280},
    {"domain_id": 4, "label": "T", "score": 0.3, "protein_start": 1320, "protein_stop": 1390}
  ]}
]"#;

pub const A_PREDICTIONS: &str = r#"[
  {"query_id": 10, "predictions": [{"label": "Thr", "homology": 0.9, "rank": 1}]},
  {"query_id": 13, "predictions": [
    {"label": "Val", "homology": 0.8, "rank": 1},
    {"label": "Leu", "homology": 0.1, "rank": 2}
  ]}
]"#;

pub const AT_PREDICTIONS: &str = r#"[
  {"query_id": 2, "predictions": [
    {"label": "Mmal", "homology": 0.7, "rank": 1},
    {"label": "Mal", "homology": 0.3, "rank": 2}
  ]}
]"#;

pub const KR_PREDICTIONS: &str = r#"[
  {"query_id": 3, "predictions": [{"label": "inactive", "homology": 0.9, "rank": 1}]}
]"#;

/// Writes a complete set of prediction files into `dir`
pub fn write_genome(dir: &Path) {
    fs::write(dir.join("domain_predictions.json"), DOMAIN_PREDICTIONS).unwrap();
    for file in KNN_FILES {
        let content = match *file {
            "A_predictions.json" => A_PREDICTIONS,
            "AT_predictions.json" => AT_PREDICTIONS,
            "KR_predictions.json" => KR_PREDICTIONS,
            _ => "[]",
        };
        fs::write(dir.join(file), content).unwrap();
    }
}

/// The CLI binary with a clean logging environment
pub fn modula() -> Command {
    let mut cmd = Command::cargo_bin("modula").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
