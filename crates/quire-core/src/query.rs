//! Filtering, sorting, and summarizing document collections.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::FieldError;
use crate::models::document::{Document, DocumentKind, Status};

/// Field a list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Issue date.
    #[default]
    Date,
    /// Recipient name, case-insensitive.
    Client,
    /// Grand total recomputed from line items.
    Amount,
}

impl FromStr for SortField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "client" => Ok(SortField::Client),
            "amount" | "total" => Ok(SortField::Amount),
            other => Err(FieldError::Unknown {
                kind: "sort field".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Filter and sort state of a list view. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub kind: Option<DocumentKind>,
    pub status: Option<Status>,
    /// Exact recipient name.
    pub client_name: Option<String>,
    /// Inclusive lower bound on the issue date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the issue date.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of number, recipient name, or email.
    pub search: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ListQuery {
    /// Whether `doc` passes every set filter.
    pub fn matches(&self, doc: &Document) -> bool {
        if self.kind.is_some_and(|kind| doc.kind != kind) {
            return false;
        }
        if self.status.is_some_and(|status| doc.status != status) {
            return false;
        }
        if let Some(client) = self.client_name.as_deref().filter(|c| !c.is_empty()) {
            if doc.recipient.name != client {
                return false;
            }
        }
        if self.date_from.is_some_and(|from| doc.issue_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| doc.issue_date > to) {
            return false;
        }
        if let Some(search) = self.search.as_deref() {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = [&doc.number, &doc.recipient.name, &doc.recipient.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

/// Documents passing `query`'s filters, in their original order.
pub fn filter_documents<'a>(docs: &'a [Document], query: &ListQuery) -> Vec<&'a Document> {
    docs.iter().filter(|doc| query.matches(doc)).collect()
}

fn compare(a: &Document, b: &Document, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.issue_date.cmp(&b.issue_date),
        SortField::Client => a
            .recipient
            .name
            .to_lowercase()
            .cmp(&b.recipient.name.to_lowercase()),
        SortField::Amount => a.grand_total().cmp(&b.grand_total()),
    }
}

/// Stable sort; ties keep their original relative order in both directions.
pub fn sort_documents(docs: &mut [&Document], field: SortField, direction: SortDirection) {
    // slice::sort_by is a stable sort.
    match direction {
        SortDirection::Asc => docs.sort_by(|a, b| compare(a, b, field)),
        SortDirection::Desc => docs.sort_by(|a, b| compare(b, a, field)),
    }
}

/// Filter then sort.
pub fn apply<'a>(docs: &'a [Document], query: &ListQuery) -> Vec<&'a Document> {
    let mut out = filter_documents(docs, query);
    sort_documents(&mut out, query.sort_field, query.sort_direction);
    out
}

/// Distinct non-empty recipient names, in order of first appearance.
pub fn client_names(docs: &[Document]) -> Vec<String> {
    let mut seen = HashSet::new();
    docs.iter()
        .map(|doc| doc.recipient.name.as_str())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Dashboard counters over invoices (quotes are skipped).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_count: usize,
    pub draft_count: usize,
    pub pending_count: usize,
    pub paid_count: usize,
    pub overdue_count: usize,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub overdue_amount: Decimal,
}

/// Count and sum invoices by status; amounts come from the line items.
pub fn dashboard_stats<'a, I>(docs: I) -> DashboardStats
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut stats = DashboardStats::default();
    for doc in docs.into_iter().filter(|doc| doc.kind == DocumentKind::Invoice) {
        let amount = doc.grand_total();
        stats.total_count += 1;
        stats.total_amount += amount;
        match doc.status {
            Status::Draft => stats.draft_count += 1,
            Status::Pending => {
                stats.pending_count += 1;
                stats.pending_amount += amount;
            }
            Status::Paid => {
                stats.paid_count += 1;
                stats.paid_amount += amount;
            }
            Status::Overdue => {
                stats.overdue_count += 1;
                stats.overdue_amount += amount;
            }
            Status::Quote => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::LineItem;
    use pretty_assertions::assert_eq;

    fn doc(number: &str, status: Status, client: &str, day: u32, price: i64) -> Document {
        let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
        let mut doc = Document::new_invoice("u1".to_string(), number, date, 30);
        doc.status = status;
        doc.recipient.name = client.to_string();
        doc.recipient.email = format!("{}@example.com", client.to_lowercase());
        doc.line_items = vec![LineItem {
            description: "Work".to_string(),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(price),
            tax_percent: Decimal::ZERO,
        }];
        doc
    }

    fn numbers(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.number.clone()).collect()
    }

    #[test]
    fn test_status_filter_preserves_order() {
        let docs = vec![
            doc("1", Status::Paid, "Acme", 1, 10),
            doc("2", Status::Pending, "Beta", 2, 20),
            doc("3", Status::Paid, "Acme", 3, 30),
        ];
        let query = ListQuery {
            status: Some(Status::Paid),
            ..Default::default()
        };
        assert_eq!(numbers(&filter_documents(&docs, &query)), vec!["1", "3"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let docs: Vec<Document> = (1..=5)
            .map(|d| doc(&d.to_string(), Status::Draft, "A", d, 1))
            .collect();
        let query = ListQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 4, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 4, 4),
            ..Default::default()
        };
        assert_eq!(numbers(&filter_documents(&docs, &query)), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_search_number_name_email() {
        let docs = vec![
            doc("INV-100", Status::Draft, "Acme", 1, 1),
            doc("INV-200", Status::Draft, "Beta", 1, 1),
        ];
        let search = |s: &str| {
            let q = ListQuery {
                search: Some(s.to_string()),
                ..Default::default()
            };
            numbers(&filter_documents(&docs, &q))
        };
        assert_eq!(search("inv-2"), vec!["INV-200"]);
        assert_eq!(search("ACME"), vec!["INV-100"]);
        assert_eq!(search("beta@"), vec!["INV-200"]);
        assert_eq!(search(""), vec!["INV-100", "INV-200"]);
    }

    #[test]
    fn test_client_filter_is_exact() {
        let docs = vec![
            doc("1", Status::Draft, "Acme", 1, 1),
            doc("2", Status::Draft, "Acme Ltd", 1, 1),
        ];
        let q = ListQuery {
            client_name: Some("Acme".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&filter_documents(&docs, &q)), vec!["1"]);
    }

    #[test]
    fn test_sort_keeps_ties_in_input_order_both_ways() {
        let docs = vec![
            doc("a", Status::Draft, "X", 1, 20),
            doc("b", Status::Draft, "X", 1, 10),
            doc("c", Status::Draft, "X", 1, 20),
            doc("d", Status::Draft, "X", 1, 10),
        ];
        let mut asc: Vec<&Document> = docs.iter().collect();
        sort_documents(&mut asc, SortField::Amount, SortDirection::Asc);
        assert_eq!(numbers(&asc), vec!["b", "d", "a", "c"]);

        let mut desc: Vec<&Document> = docs.iter().collect();
        sort_documents(&mut desc, SortField::Amount, SortDirection::Asc.toggle());
        assert_eq!(numbers(&desc), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_toggle_reverses_tie_free_order() {
        let docs = vec![
            doc("a", Status::Draft, "X", 3, 1),
            doc("b", Status::Draft, "X", 1, 1),
            doc("c", Status::Draft, "X", 2, 1),
        ];
        let mut asc: Vec<&Document> = docs.iter().collect();
        sort_documents(&mut asc, SortField::Date, SortDirection::Asc);
        let mut desc: Vec<&Document> = docs.iter().collect();
        sort_documents(&mut desc, SortField::Date, SortDirection::Desc);

        let mut reversed = numbers(&asc);
        reversed.reverse();
        assert_eq!(numbers(&desc), reversed);
    }

    #[test]
    fn test_amount_sort_ignores_snapshot() {
        let mut cheap = doc("cheap", Status::Draft, "X", 1, 5);
        cheap.total = Some(Decimal::from(1000));
        let docs = vec![cheap, doc("dear", Status::Draft, "X", 1, 50)];
        let q = ListQuery {
            sort_field: SortField::Amount,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(numbers(&apply(&docs, &q)), vec!["cheap", "dear"]);
    }

    #[test]
    fn test_client_sort_case_insensitive() {
        let docs = vec![
            doc("1", Status::Draft, "beta", 1, 1),
            doc("2", Status::Draft, "Alpha", 1, 1),
        ];
        let q = ListQuery {
            sort_field: SortField::Client,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(numbers(&apply(&docs, &q)), vec!["2", "1"]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let docs: Vec<Document> = (1..=3)
            .map(|d| doc(&d.to_string(), Status::Draft, "A", d, 1))
            .collect();
        assert_eq!(numbers(&apply(&docs, &ListQuery::default())), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_client_names_first_appearance() {
        let docs = vec![
            doc("1", Status::Draft, "Beta", 1, 1),
            doc("2", Status::Draft, "Acme", 1, 1),
            doc("3", Status::Draft, "Beta", 1, 1),
            doc("4", Status::Draft, "", 1, 1),
        ];
        assert_eq!(client_names(&docs), vec!["Beta", "Acme"]);
    }

    #[test]
    fn test_dashboard_stats_skip_quotes() {
        let mut quote = doc("q", Status::Quote, "A", 1, 500);
        quote.kind = DocumentKind::Quote;
        let docs = vec![
            doc("1", Status::Paid, "A", 1, 10),
            doc("2", Status::Pending, "A", 1, 20),
            doc("3", Status::Overdue, "A", 1, 30),
            quote,
        ];
        let stats = dashboard_stats(&docs);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.paid_count, 1);
        assert_eq!(stats.pending_amount, Decimal::from(20));
        assert_eq!(stats.total_amount, Decimal::from(60));
    }
}
