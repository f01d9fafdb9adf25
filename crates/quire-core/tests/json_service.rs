use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quire_core::editor::{CatalogLookup, HeaderField, LineItemField};
use quire_core::models::config::EditorConfig;
use quire_core::query::apply;
use quire_core::{
    Document, DocumentEditor, DocumentKind, DocumentService, JsonStore, ListQuery, Repository,
    SortField, Status,
};
use rust_decimal::Decimal;

fn json_service(dir: &std::path::Path, owner: &str) -> DocumentService {
    DocumentService::new(
        owner,
        Arc::new(JsonStore::new(dir)),
        Arc::new(JsonStore::new(dir)),
        Arc::new(JsonStore::new(dir)),
    )
}

fn edited(kind: DocumentKind, client: &str, price: &str) -> Document {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let config = EditorConfig::default();
    let mut editor = match kind {
        DocumentKind::Invoice => DocumentEditor::new_invoice(String::new(), &config, today),
        DocumentKind::Quote => DocumentEditor::new_quote(String::new(), &config, today),
    };
    editor.set_header(HeaderField::SenderName, "Northwind").unwrap();
    editor.set_header(HeaderField::RecipientName, client).unwrap();
    editor
        .set_header(
            HeaderField::RecipientEmail,
            &format!("{}@clients.test", client.to_lowercase()),
        )
        .unwrap();
    editor.update_field(0, LineItemField::Description, "Hosting").unwrap();
    editor.update_field(0, LineItemField::UnitPrice, price).unwrap();
    editor.into_document()
}

#[tokio::test]
async fn documents_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let svc = json_service(dir.path(), "u1");
        let saved = svc.save(edited(DocumentKind::Invoice, "Acme", "120")).await.unwrap();
        saved.document.id.unwrap()
    };

    let svc = json_service(dir.path(), "u1");
    let doc = svc.get(&id).await.unwrap();
    assert_eq!(doc.recipient.name, "Acme");
    assert_eq!(doc.total, Some(Decimal::from(120)));
    assert!(dir.path().join("documents.json").exists());

    let catalog = svc.catalog().await.unwrap();
    assert_eq!(catalog.clients().len(), 1);
    assert_eq!(catalog.items()[0].unit_price, Decimal::from(120));
}

#[tokio::test]
async fn list_filter_and_sort_over_stored_documents() {
    let dir = tempfile::tempdir().unwrap();
    let svc = json_service(dir.path(), "u1");
    svc.save(edited(DocumentKind::Invoice, "Beta", "50")).await.unwrap();
    svc.save(edited(DocumentKind::Invoice, "Acme", "300")).await.unwrap();
    svc.save(edited(DocumentKind::Quote, "Gamma", "10")).await.unwrap();

    let docs = svc.list().await.unwrap();
    let query = ListQuery {
        kind: Some(DocumentKind::Invoice),
        sort_field: SortField::Amount,
        ..ListQuery::default()
    };
    let names: Vec<&str> = apply(&docs, &query)
        .into_iter()
        .map(|d| d.recipient.name.as_str())
        .collect();
    assert_eq!(names, vec!["Acme", "Beta"]);
}

#[tokio::test]
async fn legacy_quote_status_reads_back_as_quote() {
    let dir = tempfile::tempdir().unwrap();
    let store: JsonStore<Document> = JsonStore::new(dir.path());
    let mut legacy = edited(DocumentKind::Invoice, "Acme", "1");
    legacy.user_id = "u1".to_string();
    legacy.status = Status::Quote;
    let created = store.create(legacy).await.unwrap();

    let svc = json_service(dir.path(), "u1");
    let read = svc.get(created.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(read.kind, DocumentKind::Quote);
    assert_eq!(svc.list_kind(DocumentKind::Quote).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_collection_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let svc = json_service(&dir.path().join("not-yet"), "u1");
    assert!(svc.list().await.unwrap().is_empty());
    assert_eq!(svc.stats().await.unwrap().total_count, 0);
}
