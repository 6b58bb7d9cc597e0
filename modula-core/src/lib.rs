//! # Modula - Module Calling for Biosynthetic Gene Clusters
//!
//! Assembles the enzymatic domains predicted on PKS and NRPS proteins into
//! modules, classifies each module and assigns it ranked chemical tags.
//!
//! ## Overview
//!
//! Polyketide synthases and nonribosomal peptide synthetases are assembly
//! lines: each module adds one building block to the growing chain. Given the
//! ordered domain calls of a protein (KS, AT, A, C, T, KR, ...), Modula
//! recovers the module layout, inserting domains the predictor missed where
//! the domain grammar demands one, and derives what each module contributes.
//!
//! ## Features
//!
//! - **Upstream filtering**: score thresholds plus context rescue for T, TE
//!   and A domains, enriched with k-NN substrate and activity calls
//! - **Synthetic patching**: in-silico C, KS and T domains at broken boundaries
//! - **Module detection**: greedy scan over a table of valid transitions
//! - **Tagging**: priority-ranked characterization rules per module type
//! - **Parallel processing**: genome directories run on a Rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use modula_core::{ModulaAnalyzer, config::ModulaConfig};
//! use modula_core::types::{DomainLabel, DomainRecord};
//!
//! let analyzer = ModulaAnalyzer::with_bundled_rules(ModulaConfig::default())?;
//!
//! let domains = vec![
//!     DomainRecord::new(DomainLabel::Adenylation, 7, 0, 400),
//!     DomainRecord::new(DomainLabel::Thiolation, 7, 450, 520),
//!     DomainRecord::new(DomainLabel::Adenylation, 7, 600, 1000),
//!     DomainRecord::new(DomainLabel::Thiolation, 7, 1050, 1120),
//! ];
//!
//! // The missing condensation domain is patched in before the second A
//! let modules = analyzer.call_modules(&domains);
//! assert_eq!(modules.len(), 2);
//! assert_eq!(modules[1].to_string(), "C(i) A T");
//! # Ok::<(), modula_core::types::ModulaError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Thresholds and run options
//! - [`engine`]: Genome-level driver and [`ModulaAnalyzer`]
//! - [`predictions`]: Upstream prediction files
//! - [`filtering`]: Region filtering and k-NN enrichment
//! - [`module`]: Patching, boundary detection, classification and tagging
//! - [`rules`]: Characterization rule table
//! - [`results`]: Module reports
//! - [`output`]: JSON writers
//! - [`upload`]: Graph-ready module records
//! - [`types`]: Domain labels, records and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, ModulaError>`](types::ModulaError),
//! covering:
//!
//! - Missing prediction files in a genome directory
//! - I/O and JSON errors
//! - Invalid configuration or rule tables

pub mod config;
pub mod constants;
pub mod engine;
pub mod filtering;
pub mod module;
pub mod output;
pub mod predictions;
pub mod results;
pub mod rules;
pub mod types;
pub mod upload;

pub use engine::ModulaAnalyzer;
pub use types::ModulaError;
