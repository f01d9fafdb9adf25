//! WASM bindings for the quire invoice editor and PDF export.
//!
//! This crate provides WebAssembly bindings for use in browsers.

use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use quire_core::editor::{DragDrop, HeaderField, LineItemField};
use quire_core::models::config::{EditorConfig, QuireConfig};
use quire_core::money::format_currency_with;
use quire_core::query::{apply, dashboard_stats};
use quire_core::{
    Catalog, Client, Document, DocumentEditor as CoreEditor, Exporter, Item, ListQuery,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    quire_core::VERSION.to_string()
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects, not Map instances.
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(js_error)
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Format an amount as `$1,234.50`.
#[wasm_bindgen]
pub fn format_currency(amount: f64, symbol: Option<String>) -> Result<String, JsValue> {
    let amount = Decimal::try_from(amount).map_err(js_error)?;
    Ok(format_currency_with(
        amount,
        symbol.as_deref().unwrap_or("$"),
    ))
}

/// Filter and sort a list of documents for display.
#[wasm_bindgen]
pub fn filter_documents(documents: JsValue, query: JsValue) -> Result<JsValue, JsValue> {
    let documents: Vec<Document> = from_js(documents)?;
    let query: ListQuery = if query.is_undefined() || query.is_null() {
        ListQuery::default()
    } else {
        from_js(query)?
    };
    to_js(&apply(&documents, &query))
}

/// Invoice counters and amounts for a dashboard.
#[wasm_bindgen]
pub fn document_stats(documents: JsValue) -> Result<JsValue, JsValue> {
    let documents: Vec<Document> = from_js(documents)?;
    to_js(&dashboard_stats(&documents))
}

/// Render a document to PDF bytes.
#[wasm_bindgen]
pub async fn render_pdf(document: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
    let document: Document = from_js(document)?;
    let rendered = Exporter::offscreen(&QuireConfig::default())
        .render(&document, &CancellationToken::new())
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::from(rendered.bytes.as_slice()))
}

/// Render a document and hand it to the browser as a download.
///
/// Returns the file name used.
#[wasm_bindgen]
pub async fn download_pdf(document: JsValue) -> Result<String, JsValue> {
    let document: Document = from_js(document)?;
    let rendered = Exporter::offscreen(&QuireConfig::default())
        .render(&document, &CancellationToken::new())
        .await
        .map_err(js_error)?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(rendered.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let page = window.document().ok_or_else(|| js_error("no document"))?;
    let anchor: web_sys::HtmlAnchorElement = page.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&rendered.file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)?;

    Ok(rendered.file_name)
}

/// Line-item editor for browser forms.
#[wasm_bindgen]
pub struct DocumentEditor {
    inner: CoreEditor,
    catalog: Catalog,
}

#[wasm_bindgen]
impl DocumentEditor {
    /// Start a new invoice, or a quote when `quote` is true.
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: String, quote: bool) -> Self {
        let today = chrono::Utc::now().date_naive();
        let config = EditorConfig::default();
        let inner = if quote {
            CoreEditor::new_quote(user_id, &config, today)
        } else {
            CoreEditor::new_invoice(user_id, &config, today)
        };
        Self {
            inner,
            catalog: Catalog::default(),
        }
    }

    /// Open a stored document.
    #[wasm_bindgen(js_name = fromDocument)]
    pub fn from_document(document: JsValue) -> Result<DocumentEditor, JsValue> {
        Ok(Self {
            inner: CoreEditor::open(from_js(document)?),
            catalog: Catalog::default(),
        })
    }

    /// Provide the saved clients and items used for autofill.
    #[wasm_bindgen(js_name = setCatalog)]
    pub fn set_catalog(&mut self, clients: JsValue, items: JsValue) -> Result<(), JsValue> {
        let clients: Vec<Client> = from_js(clients)?;
        let items: Vec<Item> = from_js(items)?;
        self.catalog = Catalog::new(clients, items);
        Ok(())
    }

    #[wasm_bindgen(js_name = addLineItem)]
    pub fn add_line_item(&mut self) -> usize {
        self.inner.add_line_item()
    }

    #[wasm_bindgen(js_name = canRemove)]
    pub fn can_remove(&self) -> bool {
        self.inner.can_remove()
    }

    #[wasm_bindgen(js_name = removeLineItem)]
    pub fn remove_line_item(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.remove_line_item(index).map_err(js_error)?;
        Ok(())
    }

    /// Move a row; returns false when the order did not change.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) -> Result<bool, JsValue> {
        self.inner.reorder(from, to).map_err(js_error)
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&mut self, source: usize) -> Result<(), JsValue> {
        self.inner.begin_drag(source).map_err(js_error)
    }

    #[wasm_bindgen(js_name = dragOver)]
    pub fn drag_over(&mut self, target: Option<usize>) {
        self.inner.drag_over(target);
    }

    pub fn drop(&mut self, source: usize, target: Option<usize>) -> Result<bool, JsValue> {
        DragDrop::drop(&mut self.inner, source, target).map_err(js_error)
    }

    /// Set a line-item field (`description`, `quantity`, `unitPrice`, `taxPercent`).
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(&mut self, index: usize, field: &str, value: &str) -> Result<(), JsValue> {
        let field: LineItemField = field.parse().map_err(js_error)?;
        self.inner.update_field(index, field, value).map_err(js_error)
    }

    /// Set a header field such as `recipient.email` or `dueDate`.
    #[wasm_bindgen(js_name = setHeader)]
    pub fn set_header(&mut self, field: &str, value: &str) -> Result<(), JsValue> {
        let field: HeaderField = field.parse().map_err(js_error)?;
        self.inner.set_header(field, value).map_err(js_error)
    }

    #[wasm_bindgen(js_name = autofillFromCatalog)]
    pub fn autofill_from_catalog(&mut self, index: usize, item_id: &str) -> Result<(), JsValue> {
        self.inner
            .autofill_from_catalog(index, item_id, &self.catalog)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = autofillRecipientFromClient)]
    pub fn autofill_recipient_from_client(&mut self, client_id: &str) -> Result<(), JsValue> {
        self.inner
            .autofill_recipient_from_client(client_id, &self.catalog)
            .map_err(js_error)
    }

    /// Catalog items matching the description in row `index`.
    pub fn suggestions(&self, index: usize) -> Result<JsValue, JsValue> {
        let items = self.inner.suggestions(index, &self.catalog).map_err(js_error)?;
        to_js(&items)
    }

    #[wasm_bindgen(js_name = openSuggestions)]
    pub fn open_suggestions(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.open_suggestions(index).map_err(js_error)
    }

    #[wasm_bindgen(js_name = closeSuggestions)]
    pub fn close_suggestions(&mut self) {
        self.inner.close_suggestions();
    }

    #[wasm_bindgen(js_name = suggestionsOpenFor)]
    pub fn suggestions_open_for(&self) -> Option<usize> {
        self.inner.suggestions_open_for()
    }

    /// `{ subtotal, taxTotal, grandTotal }` as decimal strings.
    pub fn totals(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.totals())
    }

    /// `{ errors, warnings }`, each a list of `{ field, reason }`.
    pub fn validate(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.validate())
    }

    /// The document as a plain object.
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.document())
    }
}
