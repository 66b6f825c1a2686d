// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Italian texts and inline keyboards for every [`Reply`].

use orderly_core::types::{Keyboard, KeyboardButton};
use orderly_core::{DraftId, FieldId, Order, OrderId};
use orderly_extract::template_message;

use crate::callback::CallbackAction;
use crate::reply::{FieldHint, NotFoundKind, Reply};

/// Text and optional keyboard of one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Rendered {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

const HELP: &str = "Ciao! Inviami un messaggio con il form ordine compilato e lo salverò.

Comandi disponibili:
• /orders [query] [--ready|--pending] [--from YYYY-MM-DD] [--to YYYY-MM-DD]
• /order <id> - mostra un ordine specifico
• /edit_order <id> <campo> <valore> - modifica un campo
• /search <termine> - cerca per username, prodotto o stato
• /delete_order <id> - elimina un ordine
• /fields [termine] - elenco campi con suggerimenti
• /cancel - annulla le bozze in corso";

const FAILURE: &str = "⚠️ Si è verificato un errore interno. Riprova tra poco.";
const BUSY: &str = "⏳ Sto ancora elaborando i messaggi precedenti. Rinvia questo messaggio tra poco.";

pub fn render(reply: &Reply) -> Rendered {
    match reply {
        Reply::MissingFields {
            draft_id,
            fields,
            first_prompt,
        } => {
            let list = bullet_labels(fields);
            let text = if *first_prompt {
                format!(
                    "⚠️ Ordine incompleto. Mancano:\n{list}\n\n{}",
                    template_message()
                )
            } else {
                format!("Mancano ancora:\n{list}")
            };
            Rendered::with_keyboard(text, draft_keyboard(*draft_id, fields))
        }
        Reply::RequestFieldValue {
            field, suggestions, ..
        } => Rendered::text(with_suggestions(
            format!("Inserisci il valore mancante per {}.", field.label()),
            suggestions,
        )),
        Reply::OrderSaved(order) => Rendered::with_keyboard(
            format!("✅ Ordine salvato!\n\n{}", format_order(order)),
            order_keyboard(order.id),
        ),
        Reply::OrdersSaved(orders) => {
            let cards: Vec<String> = orders.iter().map(format_order).collect();
            Rendered::text(format!("✅ Ordini salvati!\n\n{}", cards.join("\n\n")))
        }
        Reply::NotFound(NotFoundKind::Draft) => {
            Rendered::text("Bozza non trovata. Reinvia il form.")
        }
        Reply::NotFound(NotFoundKind::Order) => Rendered::text("Ordine non trovato."),
        Reply::NotFound(NotFoundKind::Action) => Rendered::text("Azione non riconosciuta."),
        Reply::InvalidValue => Rendered::text("Valore non valido."),
        Reply::InvalidNumber => Rendered::text("Inserisci un numero ordine valido."),
        Reply::Help { .. } => Rendered::text(format!("{HELP}\n\n{}", template_message())),
        Reply::Usage(usage) => Rendered::text(*usage),
        Reply::UnknownCommand(name) => Rendered::text(format!(
            "Comando sconosciuto: /{name}. Usa /start per l'elenco dei comandi."
        )),
        Reply::UnknownField => Rendered::text("Campo non valido. Usa /fields per l'elenco."),
        Reply::OrderList(orders) if orders.is_empty() => {
            Rendered::text("Nessun ordine salvato al momento.")
        }
        Reply::OrderList(orders) => {
            let lines: Vec<String> = orders.iter().map(summary_line).collect();
            Rendered::with_keyboard(
                lines.join("\n\n"),
                Keyboard::row([button("✅ Pronto", CallbackAction::ReadyPrompt)]),
            )
        }
        Reply::OrderCard(order) => {
            Rendered::with_keyboard(format_order(order), order_keyboard(order.id))
        }
        Reply::OrderUpdated(order) => Rendered::with_keyboard(
            format!("✅ Ordine aggiornato.\n\n{}", format_order(order)),
            order_keyboard(order.id),
        ),
        Reply::OrderDeleted(_) => Rendered::text("✅ Ordine eliminato."),
        Reply::OrderReady(id) => Rendered::text(format!("✅ Ordine #{id} segnato come pronto.")),
        Reply::FieldList(hints) if hints.is_empty() => {
            Rendered::text("Nessun campo trovato. Usa /fields senza filtri.")
        }
        Reply::FieldList(hints) => {
            let lines: Vec<String> = hints.iter().map(field_line).collect();
            Rendered::text(format!("Campi modificabili:\n{}", lines.join("\n")))
        }
        Reply::EditFieldPicker(order_id) => Rendered::with_keyboard(
            "Seleziona il campo da modificare:",
            Keyboard::column(FieldId::all().map(|field| {
                button(
                    field.label(),
                    CallbackAction::EditField {
                        order_id: *order_id,
                        field,
                    },
                )
            })),
        ),
        Reply::RequestEditValue {
            field, suggestions, ..
        } => Rendered::text(with_suggestions(
            format!("Inserisci il nuovo valore per {}.", field.label()),
            suggestions,
        )),
        Reply::ReadyPrompt => {
            Rendered::text("Inserisci il numero dell'ordine da segnare come pronto.")
        }
        Reply::Cancelled { drafts: 0 } => Rendered::text("Nessuna bozza da annullare."),
        Reply::Cancelled { drafts } => Rendered::text(format!("🗑️ Bozze annullate: {drafts}.")),
        Reply::Failure => Rendered::text(FAILURE),
        Reply::Busy => Rendered::text(BUSY),
    }
}

/// Full order card.
pub fn format_order(order: &Order) -> String {
    let mut lines = vec![format!("🧾 Ordine #{}", order.id)];
    lines.extend(FieldId::all().map(|field| {
        format!("• {}: {}", field.label(), order.field(field).unwrap_or("-"))
    }));
    lines.push(format!("📅 Inserito: {}", order.created_at));
    if order.ready {
        lines.push("✅ Pronto".to_string());
    }
    lines.join("\n")
}

/// Two-line summary used by order lists.
pub fn summary_line(order: &Order) -> String {
    let value = |field| order.field(field).unwrap_or("-");
    let mut head = format!(
        "{}. {} | {}",
        order.id,
        order.display_handle(),
        value(FieldId::Products)
    );
    if let Some(quantity) = order.field(FieldId::Quantity) {
        head.push_str(&format!(" ({quantity})"));
    }
    if order.ready {
        head.push_str(" | ✅");
    }
    format!(
        "{head}\n{} | {} | {}",
        value(FieldId::Address),
        value(FieldId::FullName),
        value(FieldId::Contact)
    )
}

fn field_line(hint: &FieldHint) -> String {
    let mut line = format!("{}: {}", hint.field.key(), hint.field.label());
    if !hint.examples.is_empty() {
        line.push_str(&format!(" (es: {})", hint.examples.join(", ")));
    }
    line
}

fn bullet_labels(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| format!("• {}", f.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn with_suggestions(prompt: String, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        prompt
    } else {
        format!("{prompt}\nSuggerimenti: {}", suggestions.join(", "))
    }
}

fn button(label: &str, action: CallbackAction) -> KeyboardButton {
    KeyboardButton::new(label, action.to_string())
}

fn draft_keyboard(draft_id: DraftId, fields: &[FieldId]) -> Keyboard {
    Keyboard::column(
        fields
            .iter()
            .map(|&field| button(field.label(), CallbackAction::DraftField { draft_id, field })),
    )
}

fn order_keyboard(order_id: OrderId) -> Keyboard {
    Keyboard::row([
        button("✏️ Modifica", CallbackAction::EditPrompt(order_id)),
        button("🗑️ Elimina", CallbackAction::Delete(order_id)),
    ])
}

/// Splits `text` into chunks of at most `max` characters, on line breaks
/// where possible.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current = piece.iter().collect();
                current_len = piece.len();
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::PartialRecord;

    fn order(ready: bool) -> Order {
        let mut fields = PartialRecord::new();
        fields.set(FieldId::Handle, "@anna");
        fields.set(FieldId::Products, "Kiwi");
        fields.set(FieldId::Quantity, "2 kg");
        fields.set(FieldId::Address, "Via Roma 1");
        Order {
            id: OrderId(7),
            created_at: "2026-02-04 00:00 UTC".into(),
            raw_text: String::new(),
            sender: "anna".into(),
            fields,
            put_date: None,
            ready,
        }
    }

    #[test]
    fn order_card_lists_every_field() {
        let card = format_order(&order(false));
        assert!(card.starts_with("🧾 Ordine #7\n• Username Telegram: @anna\n"));
        assert!(card.contains("• Num di Tel / Email: -"));
        assert!(card.ends_with("📅 Inserito: 2026-02-04 00:00 UTC"));
    }

    #[test]
    fn summary_line_shows_quantity_and_status() {
        assert_eq!(
            summary_line(&order(true)),
            "7. @anna | Kiwi (2 kg) | ✅\nVia Roma 1 | - | -"
        );
    }

    #[test]
    fn missing_fields_prompt_has_one_button_per_field() {
        let rendered = render(&Reply::MissingFields {
            draft_id: DraftId(2),
            fields: vec![FieldId::Contact, FieldId::Address],
            first_prompt: true,
        });
        assert!(rendered.text.starts_with(
            "⚠️ Ordine incompleto. Mancano:\n• Num di Tel / Email\n• Indirizzo o punto di ritiro\n\nFormato consigliato:"
        ));
        let keyboard = rendered.keyboard.unwrap();
        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[0][0].data, "draft_field:2:contatto");
    }

    #[test]
    fn reprompt_omits_template() {
        let rendered = render(&Reply::MissingFields {
            draft_id: DraftId(1),
            fields: vec![FieldId::Quantity],
            first_prompt: false,
        });
        assert_eq!(rendered.text, "Mancano ancora:\n• Quantità");
    }

    #[test]
    fn suggestions_are_appended() {
        let rendered = render(&Reply::RequestFieldValue {
            draft_id: DraftId(1),
            field: FieldId::PaymentMethod,
            suggestions: vec!["Bonifico".into(), "PayPal".into()],
        });
        assert_eq!(
            rendered.text,
            "Inserisci il valore mancante per Metodo di pagamento scelto.\nSuggerimenti: Bonifico, PayPal"
        );
    }

    #[test]
    fn saved_order_offers_edit_and_delete() {
        let rendered = render(&Reply::OrderSaved(order(false)));
        let keyboard = rendered.keyboard.unwrap();
        let data: Vec<&str> = keyboard.rows[0].iter().map(|b| b.data.as_str()).collect();
        assert_eq!(data, vec!["edit_prompt:7", "delete:7"]);
    }

    #[test]
    fn empty_lists_have_dedicated_texts() {
        assert_eq!(
            render(&Reply::OrderList(vec![])).text,
            "Nessun ordine salvato al momento."
        );
        assert_eq!(
            render(&Reply::FieldList(vec![])).text,
            "Nessun campo trovato. Usa /fields senza filtri."
        );
    }

    #[test]
    fn field_list_shows_examples() {
        let rendered = render(&Reply::FieldList(vec![
            FieldHint {
                field: FieldId::Products,
                examples: vec!["Kiwi".into(), "Mela".into()],
            },
            FieldHint {
                field: FieldId::Notes,
                examples: vec![],
            },
        ]));
        assert_eq!(
            rendered.text,
            "Campi modificabili:\nprodotti: Prodotto/i (es: Kiwi, Mela)\nnote: Eventuali note o richieste speciali"
        );
    }

    #[test]
    fn chunking_respects_limit_and_lines() {
        assert_eq!(chunk_text("", 10), vec![""]);
        assert_eq!(chunk_text("abc\ndef", 10), vec!["abc\ndef"]);
        assert_eq!(chunk_text("abc\ndef", 5), vec!["abc", "def"]);
        assert_eq!(chunk_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        for chunk in chunk_text(&"riga\n".repeat(100), 32) {
            assert!(chunk.chars().count() <= 32);
        }
    }
}
