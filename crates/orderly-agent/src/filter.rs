// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order list filtering and per-field value suggestions.

use chrono::NaiveDate;
use orderly_core::{FieldId, Order};
use orderly_extract::date::{created_on, parse_date};

/// Criteria for `/orders` and `/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Lower-cased free text.
    pub query: Option<String>,
    pub ready: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl OrderFilter {
    /// Parses command arguments.
    ///
    /// `--ready`, `--pending`, `--from D` and `--to D` are flags; every other
    /// token joins the query. A bound that is not a `YYYY-MM-DD` date is
    /// ignored.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut filter = OrderFilter::default();
        let mut words = Vec::new();
        let mut iter = args.iter().map(AsRef::as_ref);
        while let Some(arg) = iter.next() {
            match arg {
                "--ready" => filter.ready = Some(true),
                "--pending" => filter.ready = Some(false),
                "--from" => filter.from = iter.next().and_then(parse_date),
                "--to" => filter.to = iter.next().and_then(parse_date),
                word => words.push(word),
            }
        }
        let query = words.join(" ").trim().to_lowercase();
        filter.query = (!query.is_empty()).then_some(query);
        filter
    }

    pub fn matches(&self, order: &Order) -> bool {
        if self.ready.is_some_and(|ready| ready != order.ready) {
            return false;
        }
        if let Some(created) = created_on(&order.created_at) {
            if self.from.is_some_and(|from| created < from) {
                return false;
            }
            if self.to.is_some_and(|to| created > to) {
                return false;
            }
        }
        let Some(query) = &self.query else {
            return true;
        };
        let handle = order
            .field(FieldId::Handle)
            .unwrap_or(order.sender.as_str())
            .to_lowercase();
        let products = order.field(FieldId::Products).unwrap_or("").to_lowercase();
        let status = if order.ready { "ready" } else { "pending" };
        let query = query.as_str();
        handle.contains(query) || products.contains(query) || status.contains(query)
    }

    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }
}

/// First `limit` distinct non-empty values of `field`, in store order.
pub fn suggestions(orders: &[Order], field: FieldId, limit: usize) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in orders.iter().filter_map(|o| o.field(field)) {
        if values.len() >= limit {
            break;
        }
        let value = value.trim();
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}
