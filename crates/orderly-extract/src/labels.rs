// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Label dictionary: human-written field labels mapped to canonical fields.

use std::collections::HashMap;
use std::sync::LazyLock;

use orderly_core::FieldId;
use regex::Regex;

/// Bullet character senders put in front of labels.
pub const BULLET: char = '•';

/// Every accepted label spelling, already normalized.
const LABELS: &[(&str, FieldId)] = &[
    ("username", FieldId::Handle),
    ("username telegram", FieldId::Handle),
    ("utente telegram", FieldId::Handle),
    ("telegram", FieldId::Handle),
    ("prodotto", FieldId::Products),
    ("prodotto/i", FieldId::Products),
    ("prodotti", FieldId::Products),
    ("articoli", FieldId::Products),
    ("quantita", FieldId::Quantity),
    ("quantità", FieldId::Quantity),
    ("qta", FieldId::Quantity),
    ("qtà", FieldId::Quantity),
    ("metodo di pagamento scelto", FieldId::PaymentMethod),
    ("metodo di pagamento", FieldId::PaymentMethod),
    ("metodo pagamento", FieldId::PaymentMethod),
    ("pagamento", FieldId::PaymentMethod),
    ("nome e cognome", FieldId::FullName),
    ("nome cognome", FieldId::FullName),
    ("nominativo", FieldId::FullName),
    ("num di tel / email", FieldId::Contact),
    ("numero di tel / email", FieldId::Contact),
    ("numero di telefono", FieldId::Contact),
    ("telefono", FieldId::Contact),
    ("cellulare", FieldId::Contact),
    ("email", FieldId::Contact),
    ("e-mail", FieldId::Contact),
    ("contatto", FieldId::Contact),
    ("indirizzo o punto di ritiro", FieldId::Address),
    ("indirizzo di spedizione", FieldId::Address),
    ("indirizzo", FieldId::Address),
    ("punto di ritiro", FieldId::Address),
    ("eventuali note o richieste speciali", FieldId::Notes),
    ("richieste speciali", FieldId::Notes),
    ("note", FieldId::Notes),
];

static DICTIONARY: LazyLock<HashMap<&'static str, FieldId>> =
    LazyLock::new(|| LABELS.iter().copied().collect());

/// Dictionary spellings sorted longest first, ties broken alphabetically.
static LONGEST_FIRST: LazyLock<Vec<(&'static str, FieldId)>> = LazyLock::new(|| {
    let mut labels = LABELS.to_vec();
    labels.sort_by(|(a, _), (b, _)| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    labels
});

/// A compiled matcher for one label spelling.
pub struct LabelPattern {
    pub label: &'static str,
    pub field: FieldId,
    regex: Regex,
}

impl LabelPattern {
    /// Returns the (possibly empty) value following the label, if `line` starts with it.
    pub fn value<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }
}

/// `<bullet?> <label> <bullet?> <colon?> <value>`; the label must be followed
/// by a separator or the end of the line so `note` never matches `Notebook`.
static LABEL_PATTERNS: LazyLock<Vec<LabelPattern>> = LazyLock::new(|| {
    LONGEST_FIRST
        .iter()
        .map(|&(label, field)| {
            let body = regex::escape(label).replace(' ', r"\s*");
            let pattern =
                format!(r"(?i)^\s*•?\s*{body}(?:\s*•?\s*:\s*|\s*•\s*|\s+|$)(.*)$");
            LabelPattern {
                label,
                field,
                regex: Regex::new(&pattern).unwrap(),
            }
        })
        .collect()
});

/// Normalizes a written label into a dictionary key.
///
/// Lower-cases, drops bullets, strips trailing colons and collapses
/// whitespace runs. `normalize_label("• Prodotto/i :")` is `"prodotto/i"`.
pub fn normalize_label(label: &str) -> String {
    let lowered = label.to_lowercase().replace(BULLET, " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches(':').trim_end().to_string()
}

/// Looks up an already normalized label.
pub fn canonical_field(normalized: &str) -> Option<FieldId> {
    DICTIONARY.get(normalized).copied()
}

/// Every dictionary spelling, longest first.
pub fn labels_longest_first() -> &'static [(&'static str, FieldId)] {
    &LONGEST_FIRST
}

/// Compiled label matchers, longest first.
pub fn label_patterns() -> &'static [LabelPattern] {
    &LABEL_PATTERNS
}

/// First label that `line` starts with, with the value written after it.
pub fn match_label(line: &str) -> Option<(&'static LabelPattern, &str)> {
    LABEL_PATTERNS
        .iter()
        .find_map(|p| p.value(line).map(|value| (p, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_bullet_colon_and_spacing() {
        assert_eq!(normalize_label("• Prodotto/i :"), "prodotto/i");
        assert_eq!(normalize_label("  Nome   e\tCognome:"), "nome e cognome");
        assert_eq!(normalize_label("QUANTITÀ"), "quantità");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn dictionary_keys_are_normalized() {
        for (label, _) in LABELS {
            assert_eq!(normalize_label(label), *label, "label {label} not normalized");
        }
    }

    #[test]
    fn synonyms_share_a_field() {
        assert_eq!(canonical_field("quantita"), Some(FieldId::Quantity));
        assert_eq!(canonical_field("quantità"), Some(FieldId::Quantity));
        assert_eq!(canonical_field("prodotto"), Some(FieldId::Products));
        assert_eq!(canonical_field("prodotto/i"), Some(FieldId::Products));
        assert_eq!(
            canonical_field(&normalize_label("• Metodo di pagamento scelto:")),
            Some(FieldId::PaymentMethod)
        );
        assert_eq!(canonical_field("colore"), None);
    }

    #[test]
    fn every_field_has_a_label() {
        for field in FieldId::all() {
            assert!(
                LABELS.iter().any(|(_, f)| *f == field),
                "no label for {field}"
            );
        }
    }

    #[test]
    fn longest_labels_come_first() {
        let labels = labels_longest_first();
        for pair in labels.windows(2) {
            assert!(pair[0].0.chars().count() >= pair[1].0.chars().count());
        }
    }

    #[test]
    fn match_prefers_the_longest_label() {
        let (pattern, value) = match_label("Username Telegram: @anna").unwrap();
        assert_eq!(pattern.label, "username telegram");
        assert_eq!(value, "@anna");

        let (pattern, value) = match_label("• Metodo di pagamento scelto: PayPal").unwrap();
        assert_eq!(pattern.field, FieldId::PaymentMethod);
        assert_eq!(value, "PayPal");
    }

    #[test]
    fn match_accepts_missing_colon_and_empty_value() {
        let (pattern, value) = match_label("Quantità 2 kg").unwrap();
        assert_eq!(pattern.field, FieldId::Quantity);
        assert_eq!(value, "2 kg");

        let (pattern, value) = match_label("• Prodotto/i:").unwrap();
        assert_eq!(pattern.field, FieldId::Products);
        assert_eq!(value, "");
    }

    #[test]
    fn label_needs_a_separator() {
        assert!(match_label("Notebook Dell").is_none());
        assert!(match_label("email@example.com").is_none());
        assert!(match_label("Telegrammi vari").is_none());
    }
}
