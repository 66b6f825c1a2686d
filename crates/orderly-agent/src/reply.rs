// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-neutral replies produced by the conversation logic.
//!
//! Handlers return [`Reply`] values; [`crate::render`] turns them into text
//! and keyboards.

use orderly_core::{DraftId, FieldId, Order, OrderId};

/// What a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Draft,
    Order,
    /// A button payload that does not parse.
    Action,
}

/// A field with example values taken from stored orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHint {
    pub field: FieldId,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A draft still lacks `fields`; `first_prompt` is set when the draft was
    /// just created from a message.
    MissingFields {
        draft_id: DraftId,
        fields: Vec<FieldId>,
        first_prompt: bool,
    },
    RequestFieldValue {
        draft_id: DraftId,
        field: FieldId,
        suggestions: Vec<String>,
    },
    OrderSaved(Order),
    OrdersSaved(Vec<Order>),
    NotFound(NotFoundKind),
    /// A blank answer to a prompt; the prompt stays open.
    InvalidValue,
    /// The answer to the ready prompt is not an order number.
    InvalidNumber,
    Help { agent_name: String },
    Usage(&'static str),
    UnknownCommand(String),
    UnknownField,
    OrderList(Vec<Order>),
    OrderCard(Order),
    OrderUpdated(Order),
    OrderDeleted(OrderId),
    OrderReady(OrderId),
    FieldList(Vec<FieldHint>),
    EditFieldPicker(OrderId),
    RequestEditValue {
        order_id: OrderId,
        field: FieldId,
        suggestions: Vec<String>,
    },
    ReadyPrompt,
    Cancelled { drafts: usize },
    /// A storage failure; details are only logged.
    Failure,
    /// The conversation queue was full; the message was dropped.
    Busy,
}
