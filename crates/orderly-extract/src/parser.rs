// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block splitting and per-block parsing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use orderly_core::{FieldId, PartialRecord};
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::classifier::{classify_line, ParserContext};

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*---[ \t]*\r?$").unwrap());

/// Fields extracted from one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedBlock {
    /// `None` when no line yielded a value.
    pub record: Option<PartialRecord>,
    pub date_override: Option<NaiveDate>,
}

/// A non-empty block together with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedBlock {
    pub raw_text: String,
    pub record: PartialRecord,
    pub date_override: Option<NaiveDate>,
}

impl ExtractedBlock {
    pub fn missing_fields(&self) -> Vec<FieldId> {
        self.record.missing_fields()
    }
}

/// Splits a message into order blocks on lines holding only `---`.
///
/// Blocks are trimmed; empty ones are dropped.
pub fn split_blocks(text: &str) -> Vec<&str> {
    SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Runs the classifier over every line of `block`.
pub fn parse_block(block: &str) -> ParsedBlock {
    let lines: Vec<&str> = block.lines().collect();
    let mut ctx = ParserContext::new();
    for index in 0..lines.len() {
        let outcome = classify_line(&lines, index, &ctx);
        trace!(line = index, ?outcome, "classified line");
        ctx.apply(&outcome);
    }
    ParsedBlock {
        record: (!ctx.record.is_empty()).then_some(ctx.record),
        date_override: ctx.date_override,
    }
}

/// Splits and parses a whole message, keeping only blocks that yielded fields.
pub fn parse_message(text: &str) -> Vec<ExtractedBlock> {
    split_blocks(text)
        .into_iter()
        .filter_map(|block| {
            let parsed = parse_block(block);
            parsed.record.map(|record| ExtractedBlock {
                raw_text: block.to_string(),
                record,
                date_override: parsed.date_override,
            })
        })
        .collect()
}

/// Suggested input format, one labeled line per field.
pub fn template_message() -> String {
    let mut lines = vec!["Formato consigliato:".to_string()];
    lines.extend(FieldId::all().map(|field| format!("• {}: ...", field.label())));
    lines.push("• 2026-02-04 (opzionale per data ordine)".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_dash_lines_only() {
        let text = "a\n---\nb\n  ---  \n\n---\nc --- d\n----\ne";
        assert_eq!(split_blocks(text), vec!["a", "b", "c --- d\n----\ne"]);
    }

    #[test]
    fn split_handles_crlf_and_empty_input() {
        assert_eq!(split_blocks("a\r\n---\r\nb"), vec!["a", "b"]);
        assert!(split_blocks("  \n---\n ").is_empty());
    }

    #[test]
    fn empty_block_has_no_record() {
        let parsed = parse_block("\n   \nInformazioni utili\n");
        assert_eq!(parsed, ParsedBlock::default());
    }

    #[test]
    fn date_override_survives_without_fields() {
        let parsed = parse_block("2026-02-04");
        assert!(parsed.record.is_none());
        assert_eq!(parsed.date_override, NaiveDate::from_ymd_opt(2026, 2, 4));
    }

    #[test]
    fn sections_route_unlabeled_lines() {
        let block = "Informazioni spedizione\nAnna Bianchi\nVia Verdi 3, Torino\n\
                     Informazioni ordine\nKiwi\n3\nPayPal";
        let record = parse_block(block).record.unwrap();
        assert_eq!(record.get(FieldId::FullName), Some("Anna Bianchi"));
        assert_eq!(record.get(FieldId::Address), Some("Via Verdi 3, Torino"));
        assert_eq!(record.get(FieldId::Products), Some("Kiwi"));
        assert_eq!(record.get(FieldId::Quantity), Some("3"));
        assert_eq!(record.get(FieldId::PaymentMethod), Some("PayPal"));
    }

    #[test]
    fn parse_message_drops_empty_blocks() {
        let blocks = parse_message("Prodotti: Kiwi\n---\n\n---\nInformazioni\n---\nNote: urgente");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw_text, "Prodotti: Kiwi");
        assert_eq!(blocks[1].record.get(FieldId::Notes), Some("urgente"));
    }

    #[test]
    fn template_lists_every_label() {
        let template = template_message();
        for field in FieldId::all() {
            assert!(template.contains(field.label()));
        }
        assert!(template.starts_with("Formato consigliato:"));
    }

    #[test]
    fn template_date_hint_is_not_a_date_line() {
        let parsed = parse_block(&template_message());
        assert!(parsed.date_override.is_none());
        let record = parsed.record.unwrap();
        assert_eq!(record.get(FieldId::Handle), Some("..."));
        assert_eq!(record.get(FieldId::Notes), Some("..."));
    }
}
