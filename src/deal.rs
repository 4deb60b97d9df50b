//! Deal records as served by the deals API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::carousel::Keyed;

/// Stable identity of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub String);

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DealId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

/// A deal.
///
/// List responses carry a partial projection; the detail response fills in the optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub key: DealId,
    pub title: String,
    /// Price in cents.
    pub price: u64,
    pub cause: Cause,
    /// Image URLs, never empty for a valid deal.
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub buy_url: Option<String>,
}

impl Deal {
    /// The list projection of this deal, without the detail-only fields.
    pub fn summary(&self) -> Deal {
        Deal {
            description: None,
            user: None,
            buy_url: None,
            ..self.clone()
        }
    }

    pub fn price_display(&self) -> String {
        price_display(self.price)
    }
}

impl Keyed for Deal {
    type Key = DealId;

    fn key(&self) -> &DealId {
        &self.key
    }
}

/// Formats a price in cents: `Free` for zero, dollars with two decimals otherwise.
pub fn price_display(cents: u64) -> String {
    if cents == 0 {
        return String::from("Free");
    }

    format!("${}.{:02}", cents / 100, cents % 100)
}
