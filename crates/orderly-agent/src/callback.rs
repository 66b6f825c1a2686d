// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline button payloads.
//!
//! Payloads are short `kind:arg:arg` strings (Telegram caps them at 64
//! bytes). They are parsed exactly once, here, into [`CallbackAction`].

use std::fmt;
use std::str::FromStr;

use orderly_core::{DraftId, FieldId, OrderId};
use thiserror::Error;

/// A typed button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Fill one missing field of a draft.
    DraftField { draft_id: DraftId, field: FieldId },
    /// Show the field picker for a committed order.
    EditPrompt(OrderId),
    /// Edit one field of a committed order.
    EditField { order_id: OrderId, field: FieldId },
    /// Delete a committed order.
    Delete(OrderId),
    /// Ask for the number of the order to mark ready.
    ReadyPrompt,
}

/// A payload that does not describe any known action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed callback payload: {0:?}")]
pub struct MalformedCallback(pub String);

impl FromStr for CallbackAction {
    type Err = MalformedCallback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedCallback(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();
        let action = match parts.as_slice() {
            ["draft_field", draft, field] => CallbackAction::DraftField {
                draft_id: draft.parse().map_err(|_| malformed())?,
                field: field.parse().map_err(|_| malformed())?,
            },
            ["edit_prompt", order] => {
                CallbackAction::EditPrompt(order.parse().map_err(|_| malformed())?)
            }
            ["edit_field", order, field] => CallbackAction::EditField {
                order_id: order.parse().map_err(|_| malformed())?,
                field: field.parse().map_err(|_| malformed())?,
            },
            ["delete", order] => CallbackAction::Delete(order.parse().map_err(|_| malformed())?),
            ["ready_prompt"] => CallbackAction::ReadyPrompt,
            _ => return Err(malformed()),
        };
        Ok(action)
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::DraftField { draft_id, field } => {
                write!(f, "draft_field:{draft_id}:{}", field.key())
            }
            CallbackAction::EditPrompt(order_id) => write!(f, "edit_prompt:{order_id}"),
            CallbackAction::EditField { order_id, field } => {
                write!(f, "edit_field:{order_id}:{}", field.key())
            }
            CallbackAction::Delete(order_id) => write!(f, "delete:{order_id}"),
            CallbackAction::ReadyPrompt => f.write_str("ready_prompt"),
        }
    }
}
