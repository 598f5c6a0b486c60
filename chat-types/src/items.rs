//! Marketplace listings.
//!
//! An [`Item`]'s id doubles as the conversation key of its chat thread.

use serde::{Deserialize, Serialize};

use crate::ChatError;

/// One listing as returned by `GET /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Listing id, also the chat `item_id`
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Price in yen
    #[serde(default)]
    pub price: u64,
    /// Free-text description, split into sections for display
    #[serde(default)]
    pub description: String,
    /// Whether the listing can still be bought
    #[serde(default)]
    pub sold_out: bool,
    /// Whether a repair certificate is attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_certificate: Option<bool>,
}

impl Item {
    /// Decode the JSON array returned by `GET /items`.
    pub fn list_from_json(bytes: &[u8]) -> Result<Vec<Self>, ChatError> {
        serde_json::from_slice(bytes).map_err(ChatError::Deserialization)
    }

    /// Whether a repair certificate is attached.
    pub fn is_certified(&self) -> bool {
        self.has_certificate.unwrap_or(false)
    }

    /// Built-in listings shown when the backend has none to offer.
    pub fn samples() -> Vec<Self> {
        vec![
            Self {
                id: "sample-1".into(),
                name: "Leather shoulder bag".into(),
                price: 28_000,
                description: "【Repaired】Scuffed corners restored and oiled. \
                              The leather has its natural shine back."
                    .into(),
                sold_out: false,
                has_certificate: Some(true),
            },
            Self {
                id: "sample-2".into(),
                name: "Canvas sneakers".into(),
                price: 8_500,
                description: "Soles replaced. Uppers washed with a dedicated cleaner \
                              and given a water-repellent finish."
                    .into(),
                sold_out: false,
                has_certificate: None,
            },
            Self {
                id: "sample-3".into(),
                name: "Cashmere blend coat".into(),
                price: 32_000,
                description: "Cleaned and moth-proofed. Finished carefully with steam \
                              to keep the texture."
                    .into(),
                sold_out: false,
                has_certificate: Some(true),
            },
        ]
    }
}
