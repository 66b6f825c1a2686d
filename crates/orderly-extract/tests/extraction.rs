// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end extraction over realistic order messages.

use chrono::NaiveDate;
use orderly_core::FieldId;
use orderly_extract::{parse_block, parse_message, split_blocks};
use proptest::prelude::*;

#[test]
fn unlabeled_message_without_sections() {
    let text = "@mario_rossi\nPiazza Duomo 1, Milano\nMario Rossi\n3331234567\nBonifico\n2 kg filtrato";
    let record = parse_block(text).record.expect("fields extracted");

    assert_eq!(record.get(FieldId::Handle), Some("@mario_rossi"));
    assert!(record.get(FieldId::Address).unwrap().contains("Piazza Duomo"));
    assert_eq!(record.get(FieldId::Contact), Some("3331234567"));
    assert!(record.get(FieldId::PaymentMethod).unwrap().contains("Bonifico"));
    assert_eq!(record.get(FieldId::Quantity), Some("2 kg filtrato"));
    assert_eq!(record.get(FieldId::FullName), Some("Mario Rossi"));
    assert_eq!(record.missing_fields(), vec![FieldId::Products]);
}

#[test]
fn empty_label_takes_value_after_blank_line() {
    let record = parse_block("• Prodotto/i:\n\nFiltrato").record.unwrap();
    assert_eq!(record.get(FieldId::Products), Some("Filtrato"));
}

#[test]
fn labels_and_values_on_alternate_lines() {
    let text = "• Nome e Cognome:\nMario Rossi\n• Metodo di pagamento scelto:\nBonifico\n• Prodotto/i: Kiwi\n• Quantità: 2";
    let record = parse_block(text).record.unwrap();
    assert_eq!(record.get(FieldId::FullName), Some("Mario Rossi"));
    assert_eq!(record.get(FieldId::PaymentMethod), Some("Bonifico"));
    assert_eq!(record.get(FieldId::Products), Some("Kiwi"));
    assert_eq!(record.get(FieldId::Quantity), Some("2"));
    assert_eq!(record.len(), 4);
}

#[test]
fn labeled_assignment_beats_heuristics() {
    let record = parse_block("Prodotto/i: Kiwi").record.unwrap();
    assert_eq!(record.get(FieldId::Products), Some("Kiwi"));
    assert_eq!(record.len(), 1);
}

#[test]
fn full_template_message() {
    let text = "\
Informazioni spedizione
• Username Telegram: @anna_b
• Nome e Cognome: Anna Bianchi
• Num di Tel / Email: anna@example.com
• Indirizzo o punto di ritiro: Locker InPost Stazione Centrale
Informazioni ordine
• Prodotto/i: Kiwi
• Quantità: 3 pz
• Metodo di pagamento scelto: PayPal
• Eventuali note o richieste speciali: citofono rotto
2026-02-04";
    let parsed = parse_block(text);
    let record = parsed.record.unwrap();

    assert!(record.missing_fields().is_empty());
    assert_eq!(record.get(FieldId::Handle), Some("@anna_b"));
    assert_eq!(record.get(FieldId::Contact), Some("anna@example.com"));
    assert_eq!(record.get(FieldId::Quantity), Some("3 pz"));
    assert_eq!(record.get(FieldId::Notes), Some("citofono rotto"));
    assert_eq!(parsed.date_override, NaiveDate::from_ymd_opt(2026, 2, 4));
}

#[test]
fn multi_order_message_keeps_raw_blocks() {
    let text = "Prodotti: Kiwi\nQuantità: 1\n---\nProdotti: Mela\nQuantità: 2";
    assert_eq!(split_blocks(text).len(), 2);

    let blocks = parse_message(text);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].raw_text, "Prodotti: Mela\nQuantità: 2");
    assert_eq!(blocks[1].record.get(FieldId::Products), Some("Mela"));
}

#[test]
fn first_value_wins_within_a_block() {
    let record = parse_block("Prodotti: Kiwi\nProdotti: Mela\nNote: a\nNote: b")
        .record
        .unwrap();
    assert_eq!(record.get(FieldId::Products), Some("Kiwi"));
    assert_eq!(record.get(FieldId::Notes), Some("a"));
}

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("---".to_string()),
        Just("Informazioni spedizione".to_string()),
        Just("Informazioni ordine".to_string()),
        Just("• Prodotto/i:".to_string()),
        Just("2026-02-04".to_string()),
        Just("2026-13-40".to_string()),
        Just("@mario_rossi".to_string()),
        Just("Piazza Duomo 1".to_string()),
        Just("Mario Rossi".to_string()),
        Just("3331234567".to_string()),
        Just("Bonifico".to_string()),
        Just("2 kg".to_string()),
        "[ •\\-]{0,3}[A-Za-zàèù0-9@:/ ]{0,20}",
    ]
}

proptest! {
    #[test]
    fn values_are_trimmed_and_non_empty(lines in prop::collection::vec(line(), 0..12)) {
        let text = lines.join("\n");
        if let Some(record) = parse_block(&text).record {
            for (_, value) in record.iter() {
                prop_assert!(!value.is_empty());
                prop_assert_eq!(value, value.trim());
            }
        }
    }

    #[test]
    fn parsing_is_idempotent(lines in prop::collection::vec(line(), 0..12)) {
        let text = lines.join("\n");
        prop_assert_eq!(parse_block(&text), parse_block(&text));
        prop_assert_eq!(parse_message(&text), parse_message(&text));
    }
}
