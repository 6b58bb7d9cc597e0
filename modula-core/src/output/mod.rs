//! Output writers for module predictions and upload records.
//!
//! Both files are JSON arrays. [`OutputFormat::Json`] writes them on a single
//! line, [`OutputFormat::JsonPretty`] indents them. A trailing newline is
//! always written.
//!
//! ## Examples
//!
//! ```rust
//! use modula_core::config::OutputFormat;
//! use modula_core::output::write_module_predictions;
//! use modula_core::results::ProteinModules;
//!
//! let proteins = vec![ProteinModules { protein_id: 4, modules: Vec::new() }];
//! let mut buffer = Vec::new();
//! write_module_predictions(&mut buffer, &proteins, OutputFormat::Json)?;
//! assert_eq!(String::from_utf8(buffer).unwrap(), "[{\"protein_id\":4,\"modules\":[]}]\n");
//! # Ok::<(), modula_core::types::ModulaError>(())
//! ```

use std::io::Write;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::results::ProteinModules;
use crate::types::ModulaError;
use crate::upload::ModuleUploadRecord;

/// Writes the `module_predictions.json` document.
///
/// # Errors
///
/// Returns [`ModulaError`] if serialization or writing fails.
pub fn write_module_predictions<W: Write>(
    writer: &mut W,
    proteins: &[ProteinModules],
    format: OutputFormat,
) -> Result<(), ModulaError> {
    write_json(writer, proteins, format)
}

/// Writes the `module_upload.json` document.
pub fn write_upload_records<W: Write>(
    writer: &mut W,
    records: &[ModuleUploadRecord],
    format: OutputFormat,
) -> Result<(), ModulaError> {
    write_json(writer, records, format)
}

fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    format: OutputFormat,
) -> Result<(), ModulaError> {
    match format {
        OutputFormat::Json => serde_json::to_writer(&mut *writer, value)?,
        OutputFormat::JsonPretty => serde_json::to_writer_pretty(&mut *writer, value)?,
    }
    writeln!(writer)?;
    Ok(())
}
