// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order domain model: field identifiers, partial records, drafts ids and
//! committed orders.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Canonical order attribute.
///
/// The string form is the stable wire key stored with every order. Variants
/// are declared in prompt order, which is also the `Ord` order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum FieldId {
    #[strum(serialize = "username_telegram")]
    #[serde(rename = "username_telegram")]
    Handle,
    #[strum(serialize = "prodotti")]
    #[serde(rename = "prodotti")]
    Products,
    #[strum(serialize = "quantita")]
    #[serde(rename = "quantita")]
    Quantity,
    #[strum(serialize = "metodo_pagamento")]
    #[serde(rename = "metodo_pagamento")]
    PaymentMethod,
    #[strum(serialize = "nome_cognome")]
    #[serde(rename = "nome_cognome")]
    FullName,
    #[strum(serialize = "contatto")]
    #[serde(rename = "contatto")]
    Contact,
    #[strum(serialize = "indirizzo")]
    #[serde(rename = "indirizzo")]
    Address,
    #[strum(serialize = "note")]
    #[serde(rename = "note")]
    Notes,
}

/// Fields that must all be present before a record can become an order.
pub const REQUIRED_FIELDS: [FieldId; 7] = [
    FieldId::Handle,
    FieldId::Products,
    FieldId::Quantity,
    FieldId::PaymentMethod,
    FieldId::FullName,
    FieldId::Contact,
    FieldId::Address,
];

impl FieldId {
    /// Stable wire key, e.g. `"metodo_pagamento"`.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Display label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            FieldId::Handle => "Username Telegram",
            FieldId::Products => "Prodotto/i",
            FieldId::Quantity => "Quantità",
            FieldId::PaymentMethod => "Metodo di pagamento scelto",
            FieldId::FullName => "Nome e Cognome",
            FieldId::Contact => "Num di Tel / Email",
            FieldId::Address => "Indirizzo o punto di ritiro",
            FieldId::Notes => "Eventuali note o richieste speciali",
        }
    }

    pub fn is_required(self) -> bool {
        self != FieldId::Notes
    }

    /// All fields in declared order.
    pub fn all() -> impl Iterator<Item = FieldId> {
        FieldId::iter()
    }
}

/// Field values extracted so far for one order block.
///
/// Values are always trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialRecord(BTreeMap<FieldId, String>);

impl PartialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.0.contains_key(&field)
    }

    /// Stores `value` only when the field is still unset.
    ///
    /// Returns `true` if the value was stored.
    pub fn set_if_absent(&mut self, field: FieldId, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.0.contains_key(&field) {
            return false;
        }
        self.0.insert(field, value.to_string());
        true
    }

    /// Stores `value`, replacing any previous one. Empty values are rejected.
    pub fn set(&mut self, field: FieldId, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.0.insert(field, value.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Required fields still missing, in declared order.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        missing_fields(self)
    }
}

impl FromIterator<(FieldId, String)> for PartialRecord {
    fn from_iter<T: IntoIterator<Item = (FieldId, String)>>(iter: T) -> Self {
        let mut record = PartialRecord::new();
        for (field, value) in iter {
            record.set(field, &value);
        }
        record
    }
}

/// Required fields absent (or blank) in `record`, in declared order.
pub fn missing_fields(record: &PartialRecord) -> Vec<FieldId> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| record.get(*f).is_none_or(|v| v.trim().is_empty()))
        .collect()
}

/// Per-conversation draft number, allocated sequentially from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DraftId(pub u32);

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DraftId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DraftId)
    }
}

/// Store-assigned order number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(OrderId)
    }
}

/// A finalized record waiting for its store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Creation timestamp, `"%Y-%m-%d %H:%M UTC"`.
    pub created_at: String,
    /// The source block the fields were extracted from.
    pub raw_text: String,
    /// Sender name of the conversation that produced the order.
    pub sender: String,
    pub fields: PartialRecord,
    /// Date explicitly written in the message, if any.
    pub put_date: Option<NaiveDate>,
}

/// A committed order owned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: String,
    pub raw_text: String,
    pub sender: String,
    pub fields: PartialRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_date: Option<NaiveDate>,
    #[serde(default)]
    pub ready: bool,
}

impl Order {
    /// Builds the committed form of `new` under the given id.
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            created_at: new.created_at,
            raw_text: new.raw_text,
            sender: new.sender,
            fields: new.fields,
            put_date: new.put_date,
            ready: false,
        }
    }

    pub fn field(&self, field: FieldId) -> Option<&str> {
        self.fields.get(field)
    }

    /// The customer handle, falling back to the sender name.
    pub fn display_handle(&self) -> String {
        let handle = self
            .field(FieldId::Handle)
            .unwrap_or(self.sender.as_str())
            .trim();
        if handle.is_empty() {
            "-".to_string()
        } else if handle.starts_with('@') {
            handle.to_string()
        } else {
            format!("@{handle}")
        }
    }
}

/// Full persisted state as seen through the store's load/save contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub next_id: i64,
    pub orders: Vec<Order>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            next_id: 1,
            orders: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn field_keys_round_trip_through_strum() {
        for field in FieldId::all() {
            assert_eq!(field.to_string(), field.key());
            assert_eq!(FieldId::from_str(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn field_keys_match_serde_names() {
        assert_eq!(FieldId::Handle.key(), "username_telegram");
        assert_eq!(FieldId::PaymentMethod.key(), "metodo_pagamento");
        for field in FieldId::all() {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn required_fields_exclude_notes_only() {
        let all: Vec<_> = FieldId::all().collect();
        assert_eq!(all.len(), 8);
        assert_eq!(REQUIRED_FIELDS.len(), 7);
        assert!(!REQUIRED_FIELDS.contains(&FieldId::Notes));
        assert!(FieldId::all().filter(|f| f.is_required()).eq(REQUIRED_FIELDS));
    }

    #[test]
    fn set_if_absent_keeps_first_value() {
        let mut record = PartialRecord::new();
        assert!(record.set_if_absent(FieldId::Products, "  Kiwi "));
        assert!(!record.set_if_absent(FieldId::Products, "Mela"));
        assert_eq!(record.get(FieldId::Products), Some("Kiwi"));
    }

    #[test]
    fn blank_values_are_never_stored() {
        let mut record = PartialRecord::new();
        assert!(!record.set_if_absent(FieldId::Notes, "   "));
        assert!(!record.set(FieldId::Notes, ""));
        assert!(record.is_empty());
    }

    #[test]
    fn missing_fields_follow_declared_order() {
        let mut record = PartialRecord::new();
        record.set(FieldId::Address, "Via Roma 1");
        record.set(FieldId::Handle, "@anna");
        assert_eq!(
            missing_fields(&record),
            vec![
                FieldId::Products,
                FieldId::Quantity,
                FieldId::PaymentMethod,
                FieldId::FullName,
                FieldId::Contact,
            ]
        );
    }

    #[test]
    fn record_serializes_with_wire_keys() {
        let mut record = PartialRecord::new();
        record.set(FieldId::PaymentMethod, "Bonifico");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"metodo_pagamento":"Bonifico"}"#);
        let back: PartialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn display_handle_adds_sigil_to_sender() {
        let order = Order {
            id: OrderId(1),
            created_at: "2026-01-01 10:00 UTC".into(),
            raw_text: String::new(),
            sender: "mario".into(),
            fields: PartialRecord::new(),
            put_date: None,
            ready: false,
        };
        assert_eq!(order.display_handle(), "@mario");
    }

    #[test]
    fn malformed_ids_fail_to_parse() {
        assert!("abc".parse::<DraftId>().is_err());
        assert!("".parse::<OrderId>().is_err());
        assert_eq!(" 12 ".parse::<OrderId>().unwrap(), OrderId(12));
    }

    fn any_field() -> impl Strategy<Value = FieldId> {
        prop::sample::select(FieldId::all().collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn missing_is_empty_iff_all_required_present(
            entries in prop::collection::vec((any_field(), "[a-z ]{0,8}"), 0..16)
        ) {
            let record: PartialRecord = entries.into_iter().collect();
            let complete = REQUIRED_FIELDS
                .iter()
                .all(|f| record.get(*f).is_some_and(|v| !v.trim().is_empty()));
            prop_assert_eq!(missing_fields(&record).is_empty(), complete);
        }
    }
}
