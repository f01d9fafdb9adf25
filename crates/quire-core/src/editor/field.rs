//! Parse-and-validate step for raw field input.
//!
//! Every numeric field goes through [`parse_amount`] and a range check, so
//! non-numeric text is rejected at the boundary instead of reaching totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::error::{EditorError, FieldError, QuireError};
use crate::models::document::{Document, LineItem, Status};
use crate::money::parse_amount;

/// Editable line-item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Description,
    Quantity,
    UnitPrice,
    TaxPercent,
}

impl LineItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemField::Description => "description",
            LineItemField::Quantity => "quantity",
            LineItemField::UnitPrice => "unitPrice",
            LineItemField::TaxPercent => "taxPercent",
        }
    }
}

impl FromStr for LineItemField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "description" | "desc" => Ok(LineItemField::Description),
            "quantity" | "qty" => Ok(LineItemField::Quantity),
            "unitprice" | "price" => Ok(LineItemField::UnitPrice),
            "taxpercent" | "tax" => Ok(LineItemField::TaxPercent),
            _ => Err(FieldError::Unknown {
                kind: "line item field".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted path of a line-item field, as used in validation messages.
pub fn line_item_path(index: usize, field: LineItemField) -> String {
    format!("lineItems[{}].{}", index, field)
}

/// Parse a number and check it against an inclusive lower bound.
pub fn parse_bounded(path: &str, raw: &str, min: Decimal) -> Result<Decimal, FieldError> {
    let value = parse_amount(raw).ok_or_else(|| FieldError::NotANumber {
        field: path.to_string(),
        value: raw.to_string(),
    })?;

    if value < min {
        return Err(FieldError::OutOfRange {
            field: path.to_string(),
            value: value.to_string(),
            bound: format!(">= {}", min),
        });
    }

    Ok(value)
}

/// Apply raw input to one line-item field.
///
/// The item is left untouched when the input is rejected.
pub fn apply_line_item_field(
    item: &mut LineItem,
    index: usize,
    field: LineItemField,
    raw: &str,
) -> Result<(), FieldError> {
    let path = line_item_path(index, field);
    match field {
        LineItemField::Description => item.description = raw.to_string(),
        LineItemField::Quantity => item.quantity = parse_bounded(&path, raw, Decimal::ONE)?,
        LineItemField::UnitPrice => item.unit_price = parse_bounded(&path, raw, Decimal::ZERO)?,
        LineItemField::TaxPercent => item.tax_percent = parse_bounded(&path, raw, Decimal::ZERO)?,
    }
    Ok(())
}

/// Editable header, party, and notes fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Number,
    IssueDate,
    DueDate,
    SenderName,
    SenderBusinessName,
    SenderAddress,
    SenderPhone,
    RecipientName,
    RecipientAddress,
    RecipientEmail,
    Notes,
    Status,
}

impl HeaderField {
    pub const ALL: [HeaderField; 12] = [
        HeaderField::Number,
        HeaderField::IssueDate,
        HeaderField::DueDate,
        HeaderField::SenderName,
        HeaderField::SenderBusinessName,
        HeaderField::SenderAddress,
        HeaderField::SenderPhone,
        HeaderField::RecipientName,
        HeaderField::RecipientAddress,
        HeaderField::RecipientEmail,
        HeaderField::Notes,
        HeaderField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::Number => "number",
            HeaderField::IssueDate => "issueDate",
            HeaderField::DueDate => "dueDate",
            HeaderField::SenderName => "sender.name",
            HeaderField::SenderBusinessName => "sender.businessName",
            HeaderField::SenderAddress => "sender.address",
            HeaderField::SenderPhone => "sender.phone",
            HeaderField::RecipientName => "recipient.name",
            HeaderField::RecipientAddress => "recipient.address",
            HeaderField::RecipientEmail => "recipient.email",
            HeaderField::Notes => "notes",
            HeaderField::Status => "status",
        }
    }
}

impl FromStr for HeaderField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "");
        HeaderField::ALL
            .into_iter()
            .find(|field| field.as_str().to_lowercase() == wanted)
            .ok_or_else(|| FieldError::Unknown {
                kind: "field".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(path: &str, raw: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| FieldError::NotADate {
        field: path.to_string(),
        value: raw.to_string(),
    })
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| raw.to_string())
}

/// Apply raw input to a header field.
pub fn apply_header_field(
    doc: &mut Document,
    field: HeaderField,
    raw: &str,
) -> Result<(), QuireError> {
    let path = field.as_str();
    match field {
        HeaderField::Number => doc.number = raw.to_string(),
        HeaderField::IssueDate => doc.issue_date = parse_date(path, raw)?,
        HeaderField::DueDate => doc.due_date = parse_date(path, raw)?,
        HeaderField::SenderName => doc.sender.name = raw.to_string(),
        HeaderField::SenderBusinessName => doc.sender.business_name = optional(raw),
        HeaderField::SenderAddress => doc.sender.address = optional(raw),
        HeaderField::SenderPhone => doc.sender.phone = optional(raw),
        HeaderField::RecipientName => doc.recipient.name = raw.to_string(),
        HeaderField::RecipientAddress => doc.recipient.address = raw.to_string(),
        HeaderField::RecipientEmail => doc.recipient.email = raw.trim().to_string(),
        HeaderField::Notes => doc.notes = optional(raw),
        HeaderField::Status => {
            let status = Status::parse(raw)?;
            if !status.allowed_for(doc.kind) {
                return Err(EditorError::StatusMismatch {
                    status: status.to_string(),
                    kind: doc.kind.to_string(),
                }
                .into());
            }
            doc.status = status;
        }
    }
    Ok(())
}
