//! Saved clients and items used as autofill sources.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, UserId};

/// A saved client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    pub user_id: UserId,

    pub name: String,

    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub zip_code: String,

    #[serde(default)]
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn new(user_id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

/// A saved catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    pub user_id: UserId,

    pub description: String,

    pub unit_price: Decimal,

    #[serde(default, alias = "tax")]
    pub tax_percent: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(
        user_id: UserId,
        description: impl Into<String>,
        unit_price: Decimal,
        tax_percent: Decimal,
    ) -> Self {
        Self {
            user_id,
            description: description.into(),
            unit_price,
            tax_percent,
            ..Default::default()
        }
    }

    /// Whether this item matches a line on (description, unit price).
    pub fn matches(&self, description: &str, unit_price: Decimal) -> bool {
        self.description == description && self.unit_price == unit_price
    }
}
