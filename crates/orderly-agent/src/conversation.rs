// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation state: the draft registry and the pending prompt.
//!
//! A [`ConversationState`] is owned by exactly one conversation worker and
//! never shared, so it needs no locking.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use orderly_core::{DraftId, FieldId, NewOrder, OrderId, PartialRecord};
use orderly_extract::ExtractedBlock;
use tracing::debug;

/// An incomplete record waiting for the missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: DraftId,
    pub record: PartialRecord,
    pub raw_text: String,
    pub sender: String,
    /// Fixed when the draft is created; reused when it is finally committed.
    pub created_at: String,
    pub date_override: Option<NaiveDate>,
}

impl Draft {
    pub fn missing_fields(&self) -> Vec<FieldId> {
        self.record.missing_fields()
    }

    pub fn to_new_order(&self) -> NewOrder {
        NewOrder {
            created_at: self.created_at.clone(),
            raw_text: self.raw_text.clone(),
            sender: self.sender.clone(),
            fields: self.record.clone(),
            put_date: self.date_override,
        }
    }
}

/// What the next plain text of the conversation answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// A value for a draft field.
    DraftField { draft_id: DraftId, field: FieldId },
    /// A new value for a committed order field.
    EditField { order_id: OrderId, field: FieldId },
    /// The number of an order to mark ready.
    ReadyOrder,
}

/// Drafts and prompt state of one conversation.
#[derive(Debug)]
pub struct ConversationState {
    drafts: BTreeMap<DraftId, Draft>,
    next_draft_id: u32,
    max_drafts: usize,
    pending: Option<Pending>,
}

impl ConversationState {
    /// Creates an empty state keeping at most `max_drafts` drafts.
    pub fn new(max_drafts: usize) -> Self {
        Self {
            drafts: BTreeMap::new(),
            next_draft_id: 1,
            max_drafts: max_drafts.max(1),
            pending: None,
        }
    }

    /// Registers a draft for an incomplete block and returns its id.
    ///
    /// When the registry is full the oldest draft is dropped first.
    pub fn create_draft(
        &mut self,
        block: ExtractedBlock,
        sender: &str,
        created_at: String,
    ) -> DraftId {
        while self.drafts.len() >= self.max_drafts {
            if let Some((evicted, _)) = self.drafts.pop_first() {
                debug!(draft_id = evicted.0, "oldest draft evicted");
            }
        }
        let id = DraftId(self.next_draft_id);
        self.next_draft_id += 1;
        self.drafts.insert(
            id,
            Draft {
                id,
                record: block.record,
                raw_text: block.raw_text,
                sender: sender.to_string(),
                created_at,
                date_override: block.date_override,
            },
        );
        id
    }

    pub fn draft(&self, id: DraftId) -> Option<&Draft> {
        self.drafts.get(&id)
    }

    pub fn draft_mut(&mut self, id: DraftId) -> Option<&mut Draft> {
        self.drafts.get_mut(&id)
    }

    pub fn remove_draft(&mut self, id: DraftId) -> Option<Draft> {
        self.drafts.remove(&id)
    }

    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn drafts(&self) -> impl Iterator<Item = &Draft> {
        self.drafts.values()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn set_pending(&mut self, pending: Pending) {
        self.pending = Some(pending);
    }

    pub fn clear_pending(&mut self) -> Option<Pending> {
        self.pending.take()
    }

    /// Drops every draft and the pending prompt; returns how many drafts went.
    pub fn clear(&mut self) -> usize {
        let dropped = self.drafts.len();
        self.drafts.clear();
        self.pending = None;
        dropped
    }
}
