//! Invoice and quote document model.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FieldError;
use crate::money::{self, Totals};

use super::{RecordId, UserId};

/// Whether a document is an invoice or a quote.
///
/// Decided once when the document is created (or normalized on load) and
/// never re-derived from the status at call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    Quote,
}

impl DocumentKind {
    /// Title word used on rendered output.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Quote => "Quote",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Invoice => write!(f, "invoice"),
            DocumentKind::Quote => write!(f, "quote"),
        }
    }
}

/// Document status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
    Quote,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Draft,
        Status::Pending,
        Status::Paid,
        Status::Overdue,
        Status::Quote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Pending => "pending",
            Status::Paid => "paid",
            Status::Overdue => "overdue",
            Status::Quote => "quote",
        }
    }

    /// Parse a status name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, FieldError> {
        let s = s.trim().to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(FieldError::Unknown {
                kind: "status".to_string(),
                value: s,
            })
    }

    /// Whether this status may be carried by a document of `kind`.
    pub fn allowed_for(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Quote => *self == Status::Quote,
            DocumentKind::Invoice => *self != Status::Quote,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The issuing party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    /// Person name (required).
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The billed party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Client name (required).
    pub name: String,

    #[serde(default)]
    pub address: String,

    /// Contact email (required, non-empty only).
    pub email: String,
}

/// One billable row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default, alias = "tax")]
    pub tax_percent: Decimal,
}

impl LineItem {
    /// The blank row appended by "add line item".
    pub fn blank() -> Self {
        Self {
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            tax_percent: Decimal::ZERO,
        }
    }

    /// Line total including tax.
    pub fn total(&self) -> Decimal {
        money::line_total(self)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank()
    }
}

/// An invoice or quote.
///
/// On deserialization the kind is resolved from `kind` (or the older `type`
/// field) and the status: either one marking a quote makes it a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredDocument")]
pub struct Document {
    /// Assigned by the store on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Owner; every query and write is scoped by it.
    pub user_id: UserId,

    pub kind: DocumentKind,

    /// User supplied label, unique only by convention.
    pub number: String,

    pub issue_date: NaiveDate,

    pub due_date: NaiveDate,

    pub sender: Sender,

    pub recipient: Recipient,

    /// Print order; never empty once saved.
    pub line_items: Vec<LineItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub status: Status,

    /// Snapshot of the grand total for list display. Never trusted on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of [`Document`] before the kind is resolved.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    id: Option<RecordId>,
    user_id: UserId,
    #[serde(default, alias = "type")]
    kind: Option<DocumentKind>,
    number: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    sender: Sender,
    recipient: Recipient,
    line_items: Vec<LineItem>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    total: Option<Decimal>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<StoredDocument> for Document {
    fn from(stored: StoredDocument) -> Self {
        let mut doc = Self {
            id: stored.id,
            user_id: stored.user_id,
            kind: stored.kind.unwrap_or_default(),
            number: stored.number,
            issue_date: stored.issue_date,
            due_date: stored.due_date,
            sender: stored.sender,
            recipient: stored.recipient,
            line_items: stored.line_items,
            notes: stored.notes,
            status: stored.status,
            total: stored.total,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        };
        doc.normalize_kind();
        doc
    }
}

impl Document {
    /// A fresh invoice with one blank line item.
    pub fn new_invoice(
        user_id: UserId,
        number: impl Into<String>,
        today: NaiveDate,
        terms_days: u32,
    ) -> Self {
        Self::new(user_id, DocumentKind::Invoice, number.into(), today, terms_days)
    }

    /// A fresh quote with one blank line item.
    pub fn new_quote(
        user_id: UserId,
        number: impl Into<String>,
        today: NaiveDate,
        terms_days: u32,
    ) -> Self {
        Self::new(user_id, DocumentKind::Quote, number.into(), today, terms_days)
    }

    fn new(
        user_id: UserId,
        kind: DocumentKind,
        number: String,
        today: NaiveDate,
        terms_days: u32,
    ) -> Self {
        let status = match kind {
            DocumentKind::Invoice => Status::Draft,
            DocumentKind::Quote => Status::Quote,
        };

        Self {
            id: None,
            user_id,
            kind,
            number,
            issue_date: today,
            due_date: due_date_from(today, terms_days),
            sender: Sender::default(),
            recipient: Recipient::default(),
            line_items: vec![LineItem::blank()],
            notes: None,
            status,
            total: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_quote(&self) -> bool {
        self.kind == DocumentKind::Quote
    }

    /// Totals derived from the current line items.
    pub fn totals(&self) -> Totals {
        money::compute_totals(&self.line_items)
    }

    /// Grand total derived from the line items (ignores the stored snapshot).
    pub fn grand_total(&self) -> Decimal {
        self.totals().grand_total
    }

    /// Refresh the stored list-display snapshot from the line items.
    pub fn refresh_total_snapshot(&mut self) {
        self.total = Some(money::round_cents(self.grand_total()));
    }

    /// Title shown on the rendered page: `Invoice #<n>` or `Quote #<n>`.
    pub fn title(&self) -> String {
        format!("{} #{}", self.kind.title(), self.number)
    }

    /// Mark the document a quote when its status says so, for records that
    /// flag a quote only through the status.
    pub fn normalize_kind(&mut self) {
        if self.status == Status::Quote {
            self.kind = DocumentKind::Quote;
        }
    }

    /// Turn a quote into a draft invoice, keeping every other field.
    pub fn convert_to_invoice(&mut self) {
        self.kind = DocumentKind::Invoice;
        self.status = Status::Draft;
    }

    /// Whether any line item carries a non-zero tax rate.
    pub fn has_tax(&self) -> bool {
        self.line_items.iter().any(|item| !item.tax_percent.is_zero())
    }
}

/// Due date `terms_days` after `issue_date`.
pub fn due_date_from(issue_date: NaiveDate, terms_days: u32) -> NaiveDate {
    issue_date
        .checked_add_days(Days::new(terms_days as u64))
        .unwrap_or(issue_date)
}
