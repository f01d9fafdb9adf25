//! Document service: the owner-scoped front over the three repositories.
//!
//! Every write goes to the store first and the returned record is what the
//! caller gets back; nothing is assumed to have succeeded.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::editor::{validate_document, Catalog, DocumentEditor};
use crate::error::{EditorError, Result, ValidationError, ValidationErrors};
use crate::models::catalog::{Client, Item};
use crate::models::document::{Document, DocumentKind, Status};
use crate::models::UserId;
use crate::query::{dashboard_stats, DashboardStats};
use crate::store::Repository;

/// A stored document plus any non-blocking validation warnings.
#[derive(Debug, Clone)]
pub struct Saved {
    pub document: Document,
    pub warnings: Vec<ValidationError>,
}

/// Documents, clients, and items of one owner.
#[derive(Clone)]
pub struct DocumentService {
    owner: UserId,
    documents: Arc<dyn Repository<Document>>,
    clients: Arc<dyn Repository<Client>>,
    items: Arc<dyn Repository<Item>>,
}

impl DocumentService {
    pub fn new(
        owner: impl Into<UserId>,
        documents: Arc<dyn Repository<Document>>,
        clients: Arc<dyn Repository<Client>>,
        items: Arc<dyn Repository<Item>>,
    ) -> Self {
        Self {
            owner: owner.into(),
            documents,
            clients,
            items,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Validate and store a document; creates it when it has no id yet.
    ///
    /// A first save also remembers the recipient and line items in the
    /// catalog. Catalog failures are logged and never undo the save.
    pub async fn save(&self, mut doc: Document) -> Result<Saved> {
        doc.user_id = self.owner.clone();
        let warnings = validate_document(&doc).into_result()?;
        doc.refresh_total_snapshot();

        let document = if doc.id.is_some() {
            let updated = self.documents.update(doc).await?;
            info!("Updated {} {}", updated.kind, updated.number);
            updated
        } else {
            let created = self.documents.create(doc).await?;
            info!("Created {} {}", created.kind, created.number);
            self.remember_catalog(&created).await;
            created
        };

        Ok(Saved { document, warnings })
    }

    async fn remember_catalog(&self, doc: &Document) {
        if let Err(e) = self.remember_client(doc).await {
            warn!("Could not remember client {}: {}", doc.recipient.name, e);
        }
        if let Err(e) = self.remember_items(doc).await {
            warn!("Could not remember line items of {}: {}", doc.number, e);
        }
    }

    async fn remember_client(&self, doc: &Document) -> Result<()> {
        let email = doc.recipient.email.trim();
        if email.is_empty() {
            return Ok(());
        }
        let known = self.clients.list(&self.owner).await?;
        if known.iter().any(|c| c.email.eq_ignore_ascii_case(email)) {
            return Ok(());
        }

        let mut client = Client::new(self.owner.clone(), doc.recipient.name.clone(), email);
        client.address = doc.recipient.address.clone();
        self.clients.create(client).await?;
        debug!("Remembered client {}", doc.recipient.name);
        Ok(())
    }

    async fn remember_items(&self, doc: &Document) -> Result<()> {
        let mut known = self.items.list(&self.owner).await?;

        for line in doc.line_items.iter().filter(|l| !l.description.trim().is_empty()) {
            if known.iter().any(|i| i.matches(&line.description, line.unit_price)) {
                continue;
            }
            let item = Item::new(
                self.owner.clone(),
                line.description.clone(),
                line.unit_price,
                line.tax_percent,
            );
            known.push(self.items.create(item).await?);
            debug!("Remembered item {}", line.description);
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Document> {
        Ok(self.documents.get(&self.owner, id).await?)
    }

    /// Open a stored document in an editor (totals recomputed).
    pub async fn open(&self, id: &str) -> Result<DocumentEditor> {
        Ok(DocumentEditor::open(self.get(id).await?))
    }

    /// All documents, newest first.
    pub async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.documents.list(&self.owner).await?)
    }

    /// Documents of one kind, newest first.
    pub async fn list_kind(&self, kind: DocumentKind) -> Result<Vec<Document>> {
        let mut docs = self.list().await?;
        docs.retain(|d| d.kind == kind);
        Ok(docs)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.documents.delete(&self.owner, id).await?;
        info!("Deleted document {}", id);
        Ok(())
    }

    /// Change only the status of a stored document.
    pub async fn set_status(&self, id: &str, status: Status) -> Result<Document> {
        let mut doc = self.get(id).await?;
        if !status.allowed_for(doc.kind) {
            return Err(EditorError::StatusMismatch {
                status: status.to_string(),
                kind: doc.kind.to_string(),
            }
            .into());
        }
        doc.status = status;
        Ok(self.documents.update(doc).await?)
    }

    /// Turn a stored quote into a draft invoice.
    pub async fn convert_quote(&self, id: &str) -> Result<Document> {
        let mut doc = self.get(id).await?;
        if doc.kind != DocumentKind::Quote {
            return Err(EditorError::NotAQuote(doc.number).into());
        }
        doc.convert_to_invoice();
        let converted = self.documents.update(doc).await?;
        info!("Converted quote {} to an invoice", converted.number);
        Ok(converted)
    }

    /// Invoice counters and amounts.
    pub async fn stats(&self) -> Result<DashboardStats> {
        Ok(dashboard_stats(&self.list().await?))
    }

    /// Snapshot of the saved clients and items for autofill.
    pub async fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new(
            self.clients.list(&self.owner).await?,
            self.items.list(&self.owner).await?,
        ))
    }

    pub async fn add_client(&self, mut client: Client) -> Result<Client> {
        client.user_id = self.owner.clone();
        let mut errors = Vec::new();
        if client.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "is required"));
        }
        if client.email.trim().is_empty() {
            errors.push(ValidationError::new("email", "is required"));
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors).into());
        }
        Ok(self.clients.create(client).await?)
    }

    pub async fn remove_client(&self, id: &str) -> Result<()> {
        Ok(self.clients.delete(&self.owner, id).await?)
    }

    pub async fn add_item(&self, mut item: Item) -> Result<Item> {
        item.user_id = self.owner.clone();
        let mut errors = Vec::new();
        if item.description.trim().is_empty() {
            errors.push(ValidationError::new("description", "is required"));
        }
        if item.unit_price < Decimal::ZERO {
            errors.push(ValidationError::new("unitPrice", "must be >= 0"));
        }
        if item.tax_percent < Decimal::ZERO {
            errors.push(ValidationError::new("taxPercent", "must be >= 0"));
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors).into());
        }
        Ok(self.items.create(item).await?)
    }

    pub async fn remove_item(&self, id: &str) -> Result<()> {
        Ok(self.items.delete(&self.owner, id).await?)
    }
}
