//! Catalog lookup and description suggestions.

use crate::models::catalog::{Client, Item};

/// Read-only source of saved clients and items.
pub trait CatalogLookup {
    fn clients(&self) -> &[Client];

    fn items(&self) -> &[Item];

    fn client(&self, id: &str) -> Option<&Client> {
        self.clients().iter().find(|c| c.id.as_deref() == Some(id))
    }

    fn item(&self, id: &str) -> Option<&Item> {
        self.items().iter().find(|i| i.id.as_deref() == Some(id))
    }
}

/// In-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub clients: Vec<Client>,
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn new(clients: Vec<Client>, items: Vec<Item>) -> Self {
        Self { clients, items }
    }
}

impl CatalogLookup for Catalog {
    fn clients(&self) -> &[Client] {
        &self.clients
    }

    fn items(&self) -> &[Item] {
        &self.items
    }
}

/// Items whose description contains `query`, case-insensitively.
///
/// Blank input yields the whole catalog in its stored order.
pub fn suggest<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| item.description.to_lowercase().contains(&needle))
        .collect()
}
