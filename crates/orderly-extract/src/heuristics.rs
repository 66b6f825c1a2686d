// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule table for lines that carry a value but no recognizable label.
//!
//! Rules are tried in order and the first one whose target field is still
//! unset, whose sections include the current one and whose predicate holds
//! wins. Adding a keyword set means adding a rule, not touching the
//! classifier.

use std::sync::LazyLock;

use orderly_core::{FieldId, PartialRecord};
use regex::Regex;

/// Block section introduced by an `informazioni ...` marker line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// No marker seen yet.
    #[default]
    General,
    Shipping,
    Order,
}

/// One heuristic: a named predicate that fills `target` when it holds.
pub struct Rule {
    pub name: &'static str,
    pub target: FieldId,
    pub sections: &'static [Section],
    pub predicate: fn(&str) -> bool,
}

impl Rule {
    fn applies(&self, value: &str, section: Section, record: &PartialRecord) -> bool {
        self.sections.contains(&section)
            && !record.contains(self.target)
            && (self.predicate)(value)
    }
}

const ANY: &[Section] = &[Section::General, Section::Shipping, Section::Order];
const SHIPPING: &[Section] = &[Section::Shipping, Section::General];
const ORDER: &[Section] = &[Section::Order, Section::General];
const SHIPPING_ONLY: &[Section] = &[Section::Shipping];

/// Heuristics in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "handle",
        target: FieldId::Handle,
        sections: ANY,
        predicate: is_handle,
    },
    Rule {
        name: "contact",
        target: FieldId::Contact,
        sections: SHIPPING,
        predicate: looks_like_contact,
    },
    Rule {
        name: "address",
        target: FieldId::Address,
        sections: SHIPPING,
        predicate: looks_like_address,
    },
    Rule {
        name: "payment",
        target: FieldId::PaymentMethod,
        sections: ORDER,
        predicate: looks_like_payment,
    },
    Rule {
        name: "quantity",
        target: FieldId::Quantity,
        sections: ORDER,
        predicate: looks_like_quantity,
    },
    Rule {
        name: "name",
        target: FieldId::FullName,
        sections: SHIPPING,
        predicate: looks_like_name,
    },
    Rule {
        name: "products",
        target: FieldId::Products,
        sections: ORDER,
        predicate: always,
    },
    Rule {
        name: "name_fallback",
        target: FieldId::FullName,
        sections: SHIPPING_ONLY,
        predicate: always,
    },
];

const ADDRESS_KEYWORDS: &[&str] = &[
    "via",
    "viale",
    "corso",
    "piazza",
    "piazzale",
    "vicolo",
    "strada",
    "largo",
    "punto di ritiro",
    "ritiro",
    "locker",
    "inpost",
    "fermo point",
];

const PAYMENT_KEYWORDS: &[&str] = &[
    "bonifico", "paypal", "contanti", "cash", "carta", "postepay", "ricarica", "revolut",
    "satispay", "crypto", "bitcoin", "btc", "usdt", "eth",
];

fn keyword_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

static HANDLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@\w+$").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap());

static PHONE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]*\d").unwrap());

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| keyword_regex(ADDRESS_KEYWORDS));

static PAYMENT: LazyLock<Regex> = LazyLock::new(|| keyword_regex(PAYMENT_KEYWORDS));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[€$£]|\beur(?:o)?\b").unwrap());

static UNIT_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:[.,]\d+)?\s*(?:kg|grammi|gr|g|mg|ml|litri|lt|l|pezzi|pz|x|oz)\b",
    )
    .unwrap()
});

static NUMBER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:[.,]\d+)?(?:\s*[,/]\s*\d+(?:[.,]\d+)?|\s+\d+(?:[.,]\d+)?)*$").unwrap()
});

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}'’-]+(?:\s+[\p{L}'’-]+)+$").unwrap());

/// Strips list decoration (bullets, dashes, asterisks) from an unlabeled line.
pub fn clean_unlabeled(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '•' | '-' | '*' | '–') || c.is_whitespace())
        .trim_end()
}

/// First rule that claims `value`, if any.
pub fn classify_value(
    value: &str,
    section: Section,
    record: &PartialRecord,
) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.applies(value, section, record))
}

pub fn is_handle(value: &str) -> bool {
    HANDLE.is_match(value)
}

pub fn looks_like_contact(value: &str) -> bool {
    EMAIL.is_match(value) || has_phone_number(value)
}

fn has_phone_number(value: &str) -> bool {
    PHONE_RUN
        .find_iter(value)
        .any(|m| m.as_str().chars().filter(char::is_ascii_digit).count() >= 7)
}

pub fn looks_like_address(value: &str) -> bool {
    ADDRESS.is_match(value) || value.chars().any(|c| c.is_ascii_digit())
}

pub fn looks_like_payment(value: &str) -> bool {
    PAYMENT.is_match(value) || CURRENCY.is_match(value)
}

pub fn looks_like_quantity(value: &str) -> bool {
    UNIT_QUANTITY.is_match(value) || NUMBER_LIST.is_match(value.trim())
}

pub fn looks_like_name(value: &str) -> bool {
    !value.chars().any(|c| c.is_ascii_digit()) && !ADDRESS.is_match(value) && NAME.is_match(value)
}

fn always(_: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(value: &str, section: Section) -> Option<&'static str> {
        classify_value(value, section, &PartialRecord::new()).map(|r| r.name)
    }

    #[test]
    fn clean_strips_list_decoration() {
        assert_eq!(clean_unlabeled("  • Filtrato "), "Filtrato");
        assert_eq!(clean_unlabeled("- 2 kg"), "2 kg");
        assert_eq!(clean_unlabeled("–*  Kiwi"), "Kiwi");
        assert_eq!(clean_unlabeled("•  "), "");
    }

    #[test]
    fn contact_needs_seven_digits_or_email() {
        assert!(looks_like_contact("3331234567"));
        assert!(looks_like_contact("+39 333 123-4567"));
        assert!(looks_like_contact("anna.bianchi@example.com"));
        assert!(!looks_like_contact("Via Roma 10, 20121 Milano"));
        assert!(!looks_like_contact("2 kg"));
    }

    #[test]
    fn address_keywords_are_whole_words() {
        assert!(looks_like_address("Piazza Duomo"));
        assert!(looks_like_address("Locker InPost stazione"));
        assert!(looks_like_address("Fermo Point edicola"));
        assert!(!looks_like_address("Viaggio"));
        assert!(!looks_like_address("Bonifico"));
    }

    #[test]
    fn payment_matches_keywords_and_currency() {
        assert!(looks_like_payment("Bonifico istantaneo"));
        assert!(looks_like_payment("PayPal amici"));
        assert!(looks_like_payment("50€"));
        assert!(looks_like_payment("30 euro"));
        assert!(!looks_like_payment("Cartavetrata"));
    }

    #[test]
    fn quantity_shapes() {
        assert!(looks_like_quantity("2 kg filtrato"));
        assert!(looks_like_quantity("500g"));
        assert!(looks_like_quantity("3 pezzi"));
        assert!(looks_like_quantity("2, 3 / 4"));
        assert!(looks_like_quantity("5"));
        assert!(!looks_like_quantity("Kiwi"));
        assert!(!looks_like_quantity("Mario Rossi"));
    }

    #[test]
    fn name_requires_two_letter_words() {
        assert!(looks_like_name("Mario Rossi"));
        assert!(looks_like_name("Anna D'Angelo-Bianchi"));
        assert!(!looks_like_name("Mario"));
        assert!(!looks_like_name("Piazza Duomo"));
        assert!(!looks_like_name("Mario Rossi 2"));
    }

    #[test]
    fn general_section_priorities() {
        assert_eq!(rule_for("@anna", Section::General), Some("handle"));
        assert_eq!(rule_for("3331234567", Section::General), Some("contact"));
        assert_eq!(rule_for("Piazza Duomo 1, Milano", Section::General), Some("address"));
        assert_eq!(rule_for("Bonifico", Section::General), Some("payment"));
        assert_eq!(rule_for("Mario Rossi", Section::General), Some("name"));
        assert_eq!(rule_for("Kiwi", Section::General), Some("products"));
    }

    #[test]
    fn sections_restrict_rules() {
        assert_eq!(rule_for("Bonifico", Section::Shipping), Some("name_fallback"));
        assert_eq!(rule_for("3331234567", Section::Order), Some("quantity"));
        assert_eq!(rule_for("Mario Rossi", Section::Order), Some("products"));
        assert_eq!(rule_for("Kiwi", Section::Shipping), Some("name_fallback"));
    }

    #[test]
    fn filled_targets_are_skipped() {
        let mut record = PartialRecord::new();
        record.set(FieldId::Address, "Via Roma 1");
        let rule = classify_value("2 kg filtrato", Section::General, &record).unwrap();
        assert_eq!(rule.target, FieldId::Quantity);

        record.set(FieldId::Products, "Kiwi");
        assert!(classify_value("Mela", Section::Order, &record).is_none());
    }
}
