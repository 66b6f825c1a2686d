// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft completion.
//!
//! Every block of a message either commits at once or becomes a draft. A
//! draft is completed one field at a time: the initiator picks a missing
//! field, answers with its value and gets the remaining list back until
//! nothing is missing, at which point the draft is committed with the
//! timestamp it was created with.

use chrono::{DateTime, Utc};
use orderly_core::{DraftId, FieldId, NewOrder, OrderStore, OrderlyError};
use orderly_extract::{creation_timestamp, parse_message};
use tracing::{debug, error, info};

use crate::conversation::{ConversationState, Pending};
use crate::filter::suggestions;
use crate::reply::{NotFoundKind, Reply};

/// Drives drafts of one conversation against the shared store.
pub struct Completion<'a> {
    store: &'a dyn OrderStore,
    suggestion_limit: usize,
}

impl<'a> Completion<'a> {
    pub fn new(store: &'a dyn OrderStore, suggestion_limit: usize) -> Self {
        Self {
            store,
            suggestion_limit,
        }
    }

    /// Handles a free-text message that is not answering a prompt.
    ///
    /// Prompts for incomplete blocks come first, in block order, followed by
    /// one report for everything committed and one [`Reply::Failure`] per
    /// block the store rejected. A message with no recognizable field yields
    /// no reply.
    pub async fn ingest_message(
        &self,
        state: &mut ConversationState,
        sender: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        let blocks = parse_message(text);
        if blocks.is_empty() {
            debug!("message has no order fields");
            return Vec::new();
        }

        let mut replies = Vec::new();
        let mut saved = Vec::new();
        let mut failed = 0;
        for (index, block) in blocks.into_iter().enumerate() {
            let created_at = creation_timestamp(block.date_override, now);
            let missing = block.missing_fields();
            if missing.is_empty() {
                let committed = self
                    .store
                    .commit(NewOrder {
                        created_at,
                        raw_text: block.raw_text,
                        sender: sender.to_string(),
                        fields: block.record,
                        put_date: block.date_override,
                    })
                    .await;
                match committed {
                    Ok(order) => {
                        info!(order_id = order.id.0, "order saved");
                        saved.push(order);
                    }
                    Err(e) => {
                        error!(block = index + 1, error = %e, "order commit failed");
                        failed += 1;
                    }
                }
            } else {
                let draft_id = state.create_draft(block, sender, created_at);
                info!(draft_id = draft_id.0, missing = missing.len(), "draft created");
                replies.push(Reply::MissingFields {
                    draft_id,
                    fields: missing,
                    first_prompt: true,
                });
            }
        }

        match saved.len() {
            0 => {}
            1 => replies.extend(saved.pop().map(Reply::OrderSaved)),
            _ => replies.push(Reply::OrdersSaved(saved)),
        }
        replies.extend(std::iter::repeat_n(Reply::Failure, failed));
        replies
    }

    /// The initiator picked `field` of `draft_id`; the next text answers it.
    pub async fn select_field(
        &self,
        state: &mut ConversationState,
        draft_id: DraftId,
        field: FieldId,
    ) -> Result<Reply, OrderlyError> {
        if state.draft(draft_id).is_none() {
            return Ok(Reply::NotFound(NotFoundKind::Draft));
        }
        let orders = self.store.list().await?;
        state.set_pending(Pending::DraftField { draft_id, field });
        Ok(Reply::RequestFieldValue {
            draft_id,
            field,
            suggestions: suggestions(&orders, field, self.suggestion_limit),
        })
    }

    /// Applies `text` to the field the conversation is waiting for.
    ///
    /// A blank answer keeps the prompt open, and so does a commit the store
    /// rejected. The draft is only removed once the store accepted it.
    pub async fn answer(
        &self,
        state: &mut ConversationState,
        text: &str,
    ) -> Result<Reply, OrderlyError> {
        let Some(Pending::DraftField { draft_id, field }) = state.pending() else {
            return Ok(Reply::NotFound(NotFoundKind::Draft));
        };
        let value = text.trim();
        if value.is_empty() {
            return Ok(Reply::InvalidValue);
        }

        let Some(draft) = state.draft_mut(draft_id) else {
            state.clear_pending();
            return Ok(Reply::NotFound(NotFoundKind::Draft));
        };
        draft.record.set(field, value);
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            state.clear_pending();
            return Ok(Reply::MissingFields {
                draft_id,
                fields: missing,
                first_prompt: false,
            });
        }

        let order = self.store.commit(draft.to_new_order()).await?;
        state.clear_pending();
        state.remove_draft(draft_id);
        info!(draft_id = draft_id.0, order_id = order.id.0, "draft completed");
        Ok(Reply::OrderSaved(order))
    }
}
