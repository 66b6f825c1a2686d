// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order text extraction for the Orderly bot.
//!
//! A message is split into blocks, each block is scanned line by line and
//! every line is classified as a section marker, a date override, a labeled
//! assignment or an unlabeled value resolved by a heuristic rule table.
//! Extraction never guesses twice: the first value found for a field wins and
//! ambiguous lines are left out so the completion flow can ask for them.

pub mod classifier;
pub mod date;
pub mod heuristics;
pub mod labels;
pub mod parser;

pub use classifier::{classify_line, IgnoreReason, LineOutcome, ParserContext, Source};
pub use date::{creation_timestamp, parse_date_marker};
pub use heuristics::{Rule, Section, RULES};
pub use labels::{canonical_field, labels_longest_first, normalize_label};
pub use parser::{
    parse_block, parse_message, split_blocks, template_message, ExtractedBlock, ParsedBlock,
};
