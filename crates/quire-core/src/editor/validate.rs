//! Submission checks for a document.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{ValidationError, ValidationErrors};
use crate::models::document::Document;

use super::field::{line_item_path, LineItemField};

lazy_static! {
    // Loose shape check only; malformed addresses are warned about, never blocked.
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Outcome of validating a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Blocking issues.
    pub errors: Vec<ValidationError>,
    /// Non-blocking issues.
    pub warnings: Vec<ValidationError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok with the warnings when nothing blocks submission.
    pub fn into_result(self) -> Result<Vec<ValidationError>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }

    fn require(&mut self, field: impl Into<String>, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::new(field, "is required"));
        }
    }

    fn at_least(&mut self, field: String, value: Decimal, min: Decimal) {
        if value < min {
            self.errors
                .push(ValidationError::new(field, format!("must be >= {}", min)));
        }
    }
}

/// Whether `email` looks like an address.
pub fn looks_like_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Check required fields, numeric ranges, and status/kind agreement.
pub fn validate_document(doc: &Document) -> Validation {
    let mut v = Validation::default();

    v.require("number", &doc.number);
    v.require("sender.name", &doc.sender.name);
    v.require("recipient.name", &doc.recipient.name);
    v.require("recipient.email", &doc.recipient.email);

    if !doc.recipient.email.trim().is_empty() && !looks_like_email(&doc.recipient.email) {
        v.warnings.push(ValidationError::new(
            "recipient.email",
            "does not look like an email address",
        ));
    }

    if doc.due_date < doc.issue_date {
        v.warnings
            .push(ValidationError::new("dueDate", "is before the issue date"));
    }

    if !doc.status.allowed_for(doc.kind) {
        v.errors.push(ValidationError::new(
            "status",
            format!("{} is not valid for {} documents", doc.status, doc.kind),
        ));
    }

    if doc.line_items.is_empty() {
        v.errors
            .push(ValidationError::new("lineItems", "needs at least one line item"));
    }

    for (index, item) in doc.line_items.iter().enumerate() {
        v.require(line_item_path(index, LineItemField::Description), &item.description);
        v.at_least(
            line_item_path(index, LineItemField::Quantity),
            item.quantity,
            Decimal::ONE,
        );
        v.at_least(
            line_item_path(index, LineItemField::UnitPrice),
            item.unit_price,
            Decimal::ZERO,
        );
        v.at_least(
            line_item_path(index, LineItemField::TaxPercent),
            item.tax_percent,
            Decimal::ZERO,
        );
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{LineItem, Status};
    use chrono::NaiveDate;

    fn valid_doc() -> Document {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut doc = Document::new_invoice("u1".to_string(), "INV-1", today, 30);
        doc.sender.name = "Ada".to_string();
        doc.recipient.name = "Acme".to_string();
        doc.recipient.email = "billing@acme.test".to_string();
        doc.line_items[0] = LineItem {
            description: "Consulting".to_string(),
            quantity: Decimal::from(2),
            unit_price: Decimal::from(100),
            tax_percent: Decimal::ZERO,
        };
        doc
    }

    #[test]
    fn test_valid_document() {
        let v = validate_document(&valid_doc());
        assert!(v.is_valid(), "{:?}", v.errors);
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut doc = valid_doc();
        doc.recipient.email.clear();
        doc.line_items[0].description = "  ".to_string();
        let errors = validate_document(&doc).into_result().unwrap_err();
        assert!(errors.has("recipient.email"));
        assert!(errors.has("lineItems[0].description"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_malformed_email_is_only_a_warning() {
        let mut doc = valid_doc();
        doc.recipient.email = "not-an-email".to_string();
        let warnings = validate_document(&doc).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "recipient.email");
    }

    #[test]
    fn test_status_kind_mismatch() {
        let mut doc = valid_doc();
        doc.status = Status::Quote;
        assert!(validate_document(&doc).into_result().unwrap_err().has("status"));
    }

    #[test]
    fn test_empty_line_items() {
        let mut doc = valid_doc();
        doc.line_items.clear();
        assert!(validate_document(&doc).into_result().unwrap_err().has("lineItems"));
    }
}
