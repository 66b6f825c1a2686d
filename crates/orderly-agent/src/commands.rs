// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator slash commands.

use orderly_core::{FieldId, Order, OrderId, OrderStore, OrderlyError};
use orderly_extract::{canonical_field, normalize_label};
use tracing::info;

use crate::conversation::ConversationState;
use crate::filter::{suggestions, OrderFilter};
use crate::reply::{FieldHint, NotFoundKind, Reply};

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Orders(OrderFilter),
    /// Show one order; `None` when the argument is not a number.
    ShowOrder(Option<OrderId>),
    EditOrder {
        id: Option<OrderId>,
        field: FieldId,
        value: String,
    },
    DeleteOrder(Option<OrderId>),
    Fields(Option<String>),
    Cancel,
}

/// A slash command that could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Usage(&'static str),
    UnknownField,
    Unknown(String),
}

pub const ORDER_USAGE: &str = "Uso: /order <id>";
pub const EDIT_USAGE: &str = "Uso: /edit_order <id> <campo> <valore>";
pub const DELETE_USAGE: &str = "Uso: /delete_order <id>";
pub const SEARCH_USAGE: &str = "Uso: /search <termine>";

/// Resolves a field token typed by an operator: a wire key (`quantita`) or
/// any label spelling (`Quantità`).
pub fn parse_field(token: &str) -> Option<FieldId> {
    token
        .trim()
        .parse::<FieldId>()
        .ok()
        .or_else(|| canonical_field(&normalize_label(token)))
}

impl Command {
    /// Parses `text` when it is a slash command; plain text yields `None`.
    ///
    /// A `@botname` suffix on the command word is ignored.
    pub fn parse(text: &str) -> Option<Result<Command, CommandError>> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let mut words = rest.split_whitespace();
        let head = words.next().unwrap_or_default();
        let name = head.split('@').next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();

        let parsed = match name.as_str() {
            "start" | "help" => Ok(Command::Help),
            "orders" => Ok(Command::Orders(OrderFilter::from_args(args.as_slice()))),
            "search" if args.is_empty() => Err(CommandError::Usage(SEARCH_USAGE)),
            "search" => Ok(Command::Orders(OrderFilter::from_args(args.as_slice()))),
            "order" => match args.first() {
                None => Err(CommandError::Usage(ORDER_USAGE)),
                Some(id) => Ok(Command::ShowOrder(id.parse().ok())),
            },
            "edit_order" => match args.as_slice() {
                [id, field, value @ ..] if !value.is_empty() => match parse_field(field) {
                    Some(field) => Ok(Command::EditOrder {
                        id: id.parse().ok(),
                        field,
                        value: value.join(" "),
                    }),
                    None => Err(CommandError::UnknownField),
                },
                _ => Err(CommandError::Usage(EDIT_USAGE)),
            },
            "delete_order" => match args.first() {
                None => Err(CommandError::Usage(DELETE_USAGE)),
                Some(id) => Ok(Command::DeleteOrder(id.parse().ok())),
            },
            "fields" => {
                let term = args.join(" ").trim().to_lowercase();
                Ok(Command::Fields((!term.is_empty()).then_some(term)))
            }
            "cancel" => Ok(Command::Cancel),
            _ => Err(CommandError::Unknown(head.to_string())),
        };
        Some(parsed)
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Usage(usage) => Reply::Usage(usage),
            CommandError::UnknownField => Reply::UnknownField,
            CommandError::Unknown(name) => Reply::UnknownCommand(name),
        }
    }
}

/// Runs one command against the store and the conversation state.
pub async fn execute(
    command: Command,
    state: &mut ConversationState,
    store: &dyn OrderStore,
    agent_name: &str,
    suggestion_limit: usize,
) -> Result<Reply, OrderlyError> {
    let reply = match command {
        Command::Help => Reply::Help {
            agent_name: agent_name.to_string(),
        },
        Command::Orders(filter) => Reply::OrderList(filter.apply(store.list().await?)),
        Command::ShowOrder(id) => match lookup(store, id).await? {
            Some(order) => Reply::OrderCard(order),
            None => Reply::NotFound(NotFoundKind::Order),
        },
        Command::EditOrder { id, field, value } => match id {
            Some(id) => match store.update_field(id, field, &value).await? {
                Some(order) => {
                    info!(order_id = id.0, field = field.key(), "order field edited");
                    Reply::OrderUpdated(order)
                }
                None => Reply::NotFound(NotFoundKind::Order),
            },
            None => Reply::NotFound(NotFoundKind::Order),
        },
        Command::DeleteOrder(id) => delete(store, id).await?,
        Command::Fields(term) => {
            let orders = store.list().await?;
            let hints: Vec<FieldHint> = FieldId::all()
                .filter(|field| {
                    term.as_deref().is_none_or(|term| {
                        field.key().contains(term) || field.label().to_lowercase().contains(term)
                    })
                })
                .map(|field| FieldHint {
                    field,
                    examples: suggestions(&orders, field, suggestion_limit),
                })
                .collect();
            Reply::FieldList(hints)
        }
        Command::Cancel => {
            let drafts = state.clear();
            info!(drafts, "conversation cancelled");
            Reply::Cancelled { drafts }
        }
    };
    Ok(reply)
}

async fn lookup(
    store: &dyn OrderStore,
    id: Option<OrderId>,
) -> Result<Option<Order>, OrderlyError> {
    match id {
        Some(id) => store.get(id).await,
        None => Ok(None),
    }
}

/// Deletes an order; shared by `/delete_order` and the delete button.
pub async fn delete(store: &dyn OrderStore, id: Option<OrderId>) -> Result<Reply, OrderlyError> {
    let Some(id) = id else {
        return Ok(Reply::NotFound(NotFoundKind::Order));
    };
    if store.delete(id).await? {
        info!(order_id = id.0, "order deleted");
        Ok(Reply::OrderDeleted(id))
    } else {
        Ok(Reply::NotFound(NotFoundKind::Order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Command, CommandError> {
        Command::parse(text).expect("slash command")
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(Command::parse("Prodotti: Kiwi").is_none());
        assert!(Command::parse("  ").is_none());
    }

    #[test]
    fn start_and_help_share_a_reply() {
        assert_eq!(parse("/start"), Ok(Command::Help));
        assert_eq!(parse("/help@orderly_bot"), Ok(Command::Help));
    }

    #[test]
    fn orders_and_search_build_filters() {
        let Ok(Command::Orders(filter)) = parse("/orders kiwi --ready") else {
            panic!("expected orders");
        };
        assert_eq!(filter.query.as_deref(), Some("kiwi"));
        assert_eq!(filter.ready, Some(true));

        assert_eq!(parse("/search"), Err(CommandError::Usage(SEARCH_USAGE)));
        assert!(matches!(parse("/search anna"), Ok(Command::Orders(_))));
    }

    #[test]
    fn order_ids_are_typed() {
        assert_eq!(parse("/order 4"), Ok(Command::ShowOrder(Some(OrderId(4)))));
        assert_eq!(parse("/order abc"), Ok(Command::ShowOrder(None)));
        assert_eq!(parse("/order"), Err(CommandError::Usage(ORDER_USAGE)));
        assert_eq!(parse("/delete_order"), Err(CommandError::Usage(DELETE_USAGE)));
    }

    #[test]
    fn edit_order_joins_value_words() {
        assert_eq!(
            parse("/edit_order 3 indirizzo Via Roma 1, Milano"),
            Ok(Command::EditOrder {
                id: Some(OrderId(3)),
                field: FieldId::Address,
                value: "Via Roma 1, Milano".to_string(),
            })
        );
        assert_eq!(parse("/edit_order 3 indirizzo"), Err(CommandError::Usage(EDIT_USAGE)));
        assert_eq!(parse("/edit_order 3 colore rosso"), Err(CommandError::UnknownField));
    }

    #[test]
    fn field_tokens_accept_keys_and_labels() {
        assert_eq!(parse_field("metodo_pagamento"), Some(FieldId::PaymentMethod));
        assert_eq!(parse_field("Quantità"), Some(FieldId::Quantity));
        assert_eq!(parse_field("telefono"), Some(FieldId::Contact));
        assert_eq!(parse_field("colore"), None);
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(parse("/export"), Err(CommandError::Unknown("export".into())));
        assert_eq!(parse("/fields Pagamento"), Ok(Command::Fields(Some("pagamento".into()))));
        assert_eq!(parse("/cancel"), Ok(Command::Cancel));
    }
}
