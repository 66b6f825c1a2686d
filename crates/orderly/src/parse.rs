// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orderly parse`: offline extraction for checking message formats.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use orderly_core::{FieldId, OrderlyError, PartialRecord};
use orderly_extract::parse_message;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BlockReport<'a> {
    block: usize,
    fields: &'a PartialRecord,
    missing: Vec<FieldId>,
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_override: Option<NaiveDate>,
}

/// Reads `file` (stdin when `None`) and prints one report per order block.
pub fn run_parse(file: Option<&Path>) -> Result<(), OrderlyError> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| OrderlyError::Internal(format!("cannot read {}: {e}", path.display())))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| OrderlyError::Internal(format!("cannot read stdin: {e}")))?;
            buf
        }
    };

    println!("{}", report(&text)?);
    Ok(())
}

/// Pretty JSON array describing every block found in `text`.
fn report(text: &str) -> Result<String, OrderlyError> {
    let blocks = parse_message(text);
    let reports: Vec<BlockReport<'_>> = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let missing = block.missing_fields();
            BlockReport {
                block: i + 1,
                fields: &block.record,
                complete: missing.is_empty(),
                missing,
                date_override: block.date_override,
            }
        })
        .collect();
    serde_json::to_string_pretty(&reports)
        .map_err(|e| OrderlyError::Internal(format!("cannot encode report: {e}")))
}
