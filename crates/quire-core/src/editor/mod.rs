//! Line-item editor.
//!
//! [`DocumentEditor`] owns the in-progress [`Document`] plus editor-only
//! transient state (which row's suggestion list is open, an active drag).
//! Totals are never cached here; they are derived on every read.

pub mod field;
pub mod reorder;
pub mod suggest;
pub mod validate;

pub use field::{HeaderField, LineItemField};
pub use reorder::{move_item, DragDrop, DragState};
pub use suggest::{suggest, Catalog, CatalogLookup};
pub use validate::{validate_document, Validation};

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::error::{EditorError, QuireError, Result, ValidationError};
use crate::models::catalog::Item;
use crate::models::config::EditorConfig;
use crate::models::document::{Document, LineItem};
use crate::models::UserId;
use crate::money::Totals;
use crate::numbering::generate_number;

/// Stateful editing surface over one document.
#[derive(Debug, Clone)]
pub struct DocumentEditor {
    document: Document,
    open_suggestions: Option<usize>,
    drag: DragState,
}

impl DocumentEditor {
    /// Start a new invoice with defaults from `config`.
    pub fn new_invoice(user_id: UserId, config: &EditorConfig, today: NaiveDate) -> Self {
        let number = generate_number(&config.invoice_prefix, config.number_length);
        Self::from_document(Document::new_invoice(
            user_id,
            number,
            today,
            config.payment_terms_days,
        ))
    }

    /// Start a new quote with defaults from `config`.
    pub fn new_quote(user_id: UserId, config: &EditorConfig, today: NaiveDate) -> Self {
        let number = generate_number(&config.quote_prefix, config.number_length);
        Self::from_document(Document::new_quote(
            user_id,
            number,
            today,
            config.payment_terms_days,
        ))
    }

    /// Open a stored document for editing.
    ///
    /// The kind is resolved once here and the total snapshot is recomputed
    /// from the line items rather than trusted.
    pub fn open(mut document: Document) -> Self {
        document.normalize_kind();
        if document.line_items.is_empty() {
            document.line_items.push(LineItem::blank());
        }
        document.refresh_total_snapshot();
        Self::from_document(document)
    }

    fn from_document(document: Document) -> Self {
        Self {
            document,
            open_suggestions: None,
            drag: DragState::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.document.line_items
    }

    pub fn totals(&self) -> Totals {
        self.document.totals()
    }

    fn check_index(&self, index: usize) -> std::result::Result<(), EditorError> {
        let len = self.document.line_items.len();
        if index >= len {
            return Err(EditorError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Append a blank line item and return its index.
    pub fn add_line_item(&mut self) -> usize {
        self.document.line_items.push(LineItem::blank());
        let index = self.document.line_items.len() - 1;
        trace!("Added line item {}", index);
        index
    }

    /// Whether the remove control should be enabled.
    pub fn can_remove(&self) -> bool {
        self.document.line_items.len() > 1
    }

    /// Remove the line item at `index`. The last remaining item is kept.
    pub fn remove_line_item(&mut self, index: usize) -> std::result::Result<LineItem, EditorError> {
        self.check_index(index)?;
        if !self.can_remove() {
            return Err(EditorError::LastLineItem);
        }

        let removed = self.document.line_items.remove(index);
        self.open_suggestions = match self.open_suggestions {
            Some(open) if open == index => None,
            Some(open) if open > index => Some(open - 1),
            other => other,
        };
        trace!("Removed line item {}", index);
        Ok(removed)
    }

    /// Move the item at `from` to `to`; a missing target is a no-op.
    pub fn reorder(
        &mut self,
        from: usize,
        to: Option<usize>,
    ) -> std::result::Result<bool, EditorError> {
        let moved = move_item(&mut self.document.line_items, from, to)?;
        if moved {
            self.open_suggestions = None;
        } else {
            debug!("Reorder from {} to {:?} left order unchanged", from, to);
        }
        Ok(moved)
    }

    /// Set one line-item field from raw input.
    pub fn update_field(&mut self, index: usize, field: LineItemField, raw: &str) -> Result<()> {
        self.check_index(index)?;
        let item = &mut self.document.line_items[index];
        field::apply_line_item_field(item, index, field, raw)?;
        Ok(())
    }

    /// Set a header, party, notes, or status field from raw input.
    pub fn set_header(&mut self, field: HeaderField, raw: &str) -> Result<()> {
        field::apply_header_field(&mut self.document, field, raw)
    }

    /// Copy description, unit price, and tax from a catalog item into a row.
    pub fn autofill_from_catalog(
        &mut self,
        index: usize,
        item_id: &str,
        catalog: &dyn CatalogLookup,
    ) -> Result<()> {
        self.check_index(index)?;
        let item = catalog.item(item_id).ok_or_else(|| EditorError::CatalogMiss {
            kind: "item",
            id: item_id.to_string(),
        })?;

        let row = &mut self.document.line_items[index];
        row.description = item.description.clone();
        row.unit_price = item.unit_price;
        row.tax_percent = item.tax_percent;
        self.open_suggestions = None;
        trace!("Autofilled line item {} from item {}", index, item_id);
        Ok(())
    }

    /// Overwrite the recipient block from a saved client.
    pub fn autofill_recipient_from_client(
        &mut self,
        client_id: &str,
        catalog: &dyn CatalogLookup,
    ) -> Result<()> {
        let client = catalog.client(client_id).ok_or_else(|| EditorError::CatalogMiss {
            kind: "client",
            id: client_id.to_string(),
        })?;

        let recipient = &mut self.document.recipient;
        recipient.name = client.name.clone();
        recipient.address = client.address.clone();
        recipient.email = client.email.clone();
        Ok(())
    }

    /// Catalog items matching the description typed into row `index`.
    pub fn suggestions<'a>(
        &self,
        index: usize,
        catalog: &'a dyn CatalogLookup,
    ) -> std::result::Result<Vec<&'a Item>, EditorError> {
        self.check_index(index)?;
        Ok(suggest(
            catalog.items(),
            &self.document.line_items[index].description,
        ))
    }

    /// Open the suggestion list for row `index`, closing any other.
    pub fn open_suggestions(&mut self, index: usize) -> std::result::Result<(), EditorError> {
        self.check_index(index)?;
        self.open_suggestions = Some(index);
        Ok(())
    }

    pub fn close_suggestions(&mut self) {
        self.open_suggestions = None;
    }

    /// Row whose suggestion list is open, if any.
    pub fn suggestions_open_for(&self) -> Option<usize> {
        self.open_suggestions
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn validate(&self) -> Validation {
        validate_document(&self.document)
    }

    /// Validate and hand back the document ready for saving, with warnings.
    pub fn finish(mut self) -> Result<(Document, Vec<ValidationError>)> {
        let warnings = self.validate().into_result().map_err(QuireError::from)?;
        self.document.refresh_total_snapshot();
        Ok((self.document, warnings))
    }
}

impl DragDrop for DocumentEditor {
    fn begin_drag(&mut self, source: usize) -> std::result::Result<(), EditorError> {
        self.check_index(source)?;
        self.drag = DragState {
            source: Some(source),
            over: None,
        };
        Ok(())
    }

    fn drag_over(&mut self, target: Option<usize>) {
        if self.drag.is_dragging() {
            self.drag.over = target;
        }
    }

    fn drop(
        &mut self,
        source: usize,
        target: Option<usize>,
    ) -> std::result::Result<bool, EditorError> {
        self.drag.clear();
        self.reorder(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Client, Item};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn editor() -> DocumentEditor {
        DocumentEditor::new_invoice("u1".to_string(), &EditorConfig::default(), today())
    }

    fn catalog() -> Catalog {
        let mut item = Item::new(
            "u1".to_string(),
            "Hosting",
            Decimal::new(1999, 2),
            Decimal::from(20),
        );
        item.id = Some("item-1".to_string());
        let mut client = Client::new("u1".to_string(), "Acme", "ap@acme.test");
        client.id = Some("client-1".to_string());
        client.address = "1 Main St".to_string();
        client.phone = "555".to_string();
        Catalog::new(vec![client], vec![item])
    }

    #[test]
    fn test_new_invoice_defaults() {
        let editor = editor();
        let doc = editor.document();
        assert!(doc.number.starts_with("INV-"));
        assert_eq!(doc.issue_date, today());
        assert_eq!(doc.due_date, NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
        assert_eq!(doc.line_items.len(), 1);
    }

    #[test]
    fn test_cannot_remove_last_item() {
        let mut editor = editor();
        assert!(!editor.can_remove());
        assert_eq!(editor.remove_line_item(0), Err(EditorError::LastLineItem));
        assert_eq!(editor.line_items().len(), 1);
    }

    #[test]
    fn test_add_then_remove() {
        let mut editor = editor();
        assert_eq!(editor.add_line_item(), 1);
        editor.update_field(1, LineItemField::Description, "Second").unwrap();
        let removed = editor.remove_line_item(0).unwrap();
        assert_eq!(removed, LineItem::blank());
        assert_eq!(editor.line_items()[0].description, "Second");
    }

    #[test]
    fn test_update_field_rejects_non_numeric() {
        let mut editor = editor();
        let err = editor.update_field(0, LineItemField::UnitPrice, "abc").unwrap_err();
        assert!(matches!(err, QuireError::Field(_)));
        assert_eq!(editor.totals(), Totals::default());
    }

    #[test]
    fn test_update_field_index_out_of_range() {
        let mut editor = editor();
        let err = editor.update_field(4, LineItemField::Quantity, "2").unwrap_err();
        assert!(matches!(
            err,
            QuireError::Editor(EditorError::IndexOutOfRange { index: 4, len: 1 })
        ));
    }

    #[test]
    fn test_autofill_from_catalog_overwrites() {
        let mut editor = editor();
        editor.update_field(0, LineItemField::Description, "old").unwrap();
        editor.update_field(0, LineItemField::Quantity, "3").unwrap();
        editor.autofill_from_catalog(0, "item-1", &catalog()).unwrap();

        let row = &editor.line_items()[0];
        assert_eq!(row.description, "Hosting");
        assert_eq!(row.unit_price, Decimal::new(1999, 2));
        assert_eq!(row.tax_percent, Decimal::from(20));
        assert_eq!(row.quantity, Decimal::from(3));
    }

    #[test]
    fn test_autofill_unknown_item() {
        let mut editor = editor();
        let err = editor.autofill_from_catalog(0, "nope", &catalog()).unwrap_err();
        assert!(matches!(err, QuireError::Editor(EditorError::CatalogMiss { kind: "item", .. })));
    }

    #[test]
    fn test_autofill_recipient() {
        let mut editor = editor();
        editor.autofill_recipient_from_client("client-1", &catalog()).unwrap();
        let recipient = &editor.document().recipient;
        assert_eq!(recipient.name, "Acme");
        assert_eq!(recipient.address, "1 Main St");
        assert_eq!(recipient.email, "ap@acme.test");
    }

    #[test]
    fn test_suggestions_follow_description() {
        let catalog = catalog();
        let mut editor = editor();
        assert_eq!(editor.suggestions(0, &catalog).unwrap().len(), 1);
        editor.update_field(0, LineItemField::Description, "HOST").unwrap();
        assert_eq!(editor.suggestions(0, &catalog).unwrap().len(), 1);
        editor.update_field(0, LineItemField::Description, "paint").unwrap();
        assert!(editor.suggestions(0, &catalog).unwrap().is_empty());
    }

    #[test]
    fn test_open_suggestions_shift_on_remove() {
        let mut editor = editor();
        editor.add_line_item();
        editor.add_line_item();
        editor.open_suggestions(2).unwrap();
        editor.remove_line_item(0).unwrap();
        assert_eq!(editor.suggestions_open_for(), Some(1));
        editor.remove_line_item(1).unwrap();
        assert_eq!(editor.suggestions_open_for(), None);
    }

    #[test]
    fn test_drag_drop_outside_target() {
        let mut editor = editor();
        editor.add_line_item();
        editor.update_field(0, LineItemField::Description, "a").unwrap();
        editor.update_field(1, LineItemField::Description, "b").unwrap();

        editor.begin_drag(0).unwrap();
        editor.drag_over(Some(1));
        editor.drag_over(None);
        assert!(!DragDrop::drop(&mut editor, 0, None).unwrap());
        assert_eq!(editor.line_items()[0].description, "a");
        assert!(!editor.drag_state().is_dragging());

        assert!(DragDrop::drop(&mut editor, 0, Some(1)).unwrap());
        assert_eq!(editor.line_items()[0].description, "b");
    }

    #[test]
    fn test_open_recomputes_snapshot() {
        let mut doc = editor().into_document();
        doc.line_items[0].unit_price = Decimal::from(10);
        doc.total = Some(Decimal::from(999));
        let editor = DocumentEditor::open(doc);
        assert_eq!(editor.document().total, Some(Decimal::from(10)));
    }

    #[test]
    fn test_set_status_on_quote() {
        let mut editor =
            DocumentEditor::new_quote("u1".to_string(), &EditorConfig::default(), today());
        assert!(editor.document().number.starts_with("QUO-"));
        let err = editor.set_header(HeaderField::Status, "paid").unwrap_err();
        assert!(matches!(err, QuireError::Editor(EditorError::StatusMismatch { .. })));
    }

    #[test]
    fn test_finish_blocks_invalid() {
        let err = editor().finish().unwrap_err();
        match err {
            QuireError::Validation(errors) => {
                assert!(errors.has("sender.name"));
                assert!(errors.has("lineItems[0].description"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
