// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line classification.
//!
//! [`classify_line`] is a pure function of the block's lines, the index of
//! the line under scan and the current [`ParserContext`]. It never mutates
//! the context; [`ParserContext::apply`] does.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use orderly_core::{FieldId, PartialRecord};

use crate::date::parse_date_marker;
use crate::heuristics::{self, Section};
use crate::labels::match_label;

/// Per-block scan state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserContext {
    pub section: Section,
    pub record: PartialRecord,
    pub date_override: Option<NaiveDate>,
    /// Lines already consumed as the value of an empty label.
    pub borrowed: BTreeSet<usize>,
}

/// Where an assigned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A bare `@handle` line.
    Handle,
    /// `label: value` on the same line.
    Label(&'static str),
    /// Label with an empty value, filled from the following line `line`.
    Lookahead { label: &'static str, line: usize },
    /// Unlabeled line claimed by the named heuristic rule.
    Heuristic(&'static str),
}

/// Why a line contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Blank,
    GenericMarker,
    DuplicateDate,
    LabelWithoutValue,
    FieldAlreadySet,
    /// Value line already taken by an earlier empty label.
    Borrowed,
    Unclassified,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    EnterSection(Section),
    DateOverride(NaiveDate),
    Assign {
        field: FieldId,
        value: String,
        source: Source,
    },
    Ignored(IgnoreReason),
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the context.
    pub fn apply(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::EnterSection(section) => self.section = *section,
            LineOutcome::DateOverride(date) => {
                if self.date_override.is_none() {
                    self.date_override = Some(*date);
                }
            }
            LineOutcome::Assign {
                field,
                value,
                source,
            } => {
                self.record.set_if_absent(*field, value);
                if let Source::Lookahead { line, .. } = source {
                    self.borrowed.insert(*line);
                }
            }
            LineOutcome::Ignored(_) => {}
        }
    }
}

/// Classifies `lines[index]` against `ctx`.
///
/// Out-of-range indices are treated as blank lines.
pub fn classify_line(lines: &[&str], index: usize, ctx: &ParserContext) -> LineOutcome {
    let Some(line) = lines.get(index).map(|l| l.trim()) else {
        return LineOutcome::Ignored(IgnoreReason::Blank);
    };
    if line.is_empty() {
        return LineOutcome::Ignored(IgnoreReason::Blank);
    }

    let lowered = line.to_lowercase();
    if lowered.contains("informazioni spedizione") {
        return LineOutcome::EnterSection(Section::Shipping);
    }
    if lowered.contains("informazioni ordine") {
        return LineOutcome::EnterSection(Section::Order);
    }
    if lowered.contains("informazioni") {
        return LineOutcome::Ignored(IgnoreReason::GenericMarker);
    }

    if let Some(date) = parse_date_marker(line) {
        return if ctx.date_override.is_none() {
            LineOutcome::DateOverride(date)
        } else {
            LineOutcome::Ignored(IgnoreReason::DuplicateDate)
        };
    }

    if ctx.borrowed.contains(&index) {
        return LineOutcome::Ignored(IgnoreReason::Borrowed);
    }

    if heuristics::is_handle(line) && !ctx.record.contains(FieldId::Handle) {
        return LineOutcome::Assign {
            field: FieldId::Handle,
            value: line.to_string(),
            source: Source::Handle,
        };
    }

    if let Some((pattern, value)) = match_label(line) {
        if ctx.record.contains(pattern.field) {
            return LineOutcome::Ignored(IgnoreReason::FieldAlreadySet);
        }
        if !value.is_empty() {
            return LineOutcome::Assign {
                field: pattern.field,
                value: value.to_string(),
                source: Source::Label(pattern.label),
            };
        }
        return match borrow_value(lines, index) {
            Some((line, value)) => LineOutcome::Assign {
                field: pattern.field,
                value,
                source: Source::Lookahead {
                    label: pattern.label,
                    line,
                },
            },
            None => LineOutcome::Ignored(IgnoreReason::LabelWithoutValue),
        };
    }

    let value = heuristics::clean_unlabeled(line);
    if value.is_empty() {
        return LineOutcome::Ignored(IgnoreReason::Blank);
    }
    match heuristics::classify_value(value, ctx.section, &ctx.record) {
        Some(rule) => LineOutcome::Assign {
            field: rule.target,
            value: value.to_string(),
            source: Source::Heuristic(rule.name),
        },
        None => LineOutcome::Ignored(IgnoreReason::Unclassified),
    }
}

/// Value for a label written with nothing after it: the next line that is
/// neither blank, a marker, nor another label, with its index.
fn borrow_value(lines: &[&str], index: usize) -> Option<(usize, String)> {
    for (at, next) in lines.iter().enumerate().skip(index + 1) {
        let next = next.trim();
        if next.is_empty() || next.to_lowercase().contains("informazioni") {
            continue;
        }
        if match_label(next).is_some() {
            return None;
        }
        let cleaned = heuristics::clean_unlabeled(next);
        if !cleaned.is_empty() {
            return Some((at, cleaned.to_string()));
        }
    }
    None
}
