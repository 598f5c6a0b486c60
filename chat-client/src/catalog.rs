//! Marketplace listings with a built-in fallback.
//!
//! The listing page always has something to show: when `GET /items`
//! fails, answers non-2xx, or returns an empty array, the built-in
//! [`Item::samples`] are used instead.

use chat_types::Item;

use crate::backend::Backend;

/// Where a catalog's listings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Returned by the backend.
    Backend,
    /// Built-in sample listings.
    Samples,
}

/// Listings ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// The listings, in backend order.
    pub items: Vec<Item>,
    /// Where they came from.
    pub source: CatalogSource,
}

impl Catalog {
    fn samples() -> Self {
        Self {
            items: Item::samples(),
            source: CatalogSource::Samples,
        }
    }
}

/// Fetch the listings, falling back to the samples.
pub async fn load_catalog<B: Backend>(backend: &B) -> Catalog {
    match backend.list_items().await {
        Ok(items) if !items.is_empty() => {
            tracing::debug!(count = items.len(), "Fetched listings");
            Catalog {
                items,
                source: CatalogSource::Backend,
            }
        }
        Ok(_) => {
            tracing::info!("Backend has no listings, showing samples");
            Catalog::samples()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch listings, showing samples");
            Catalog::samples()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MockBackend};

    fn listing(id: &str) -> Item {
        Item {
            id: id.into(),
            name: "Wool scarf".into(),
            price: 4_200,
            description: "Pilling removed".into(),
            sold_out: true,
            has_certificate: None,
        }
    }

    #[tokio::test]
    async fn backend_listings_are_used_as_is() {
        let backend = MockBackend::new();
        backend.seed_item(listing("item-1"));
        backend.seed_item(listing("item-2"));

        let catalog = load_catalog(&backend).await;

        assert_eq!(catalog.source, CatalogSource::Backend);
        let ids: Vec<_> = catalog.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-1", "item-2"]);
    }

    #[tokio::test]
    async fn empty_listing_falls_back_to_samples() {
        let backend = MockBackend::new();

        let catalog = load_catalog(&backend).await;

        assert_eq!(catalog.source, CatalogSource::Samples);
        assert_eq!(catalog.items, Item::samples());
        assert_eq!(backend.item_requests(), 1);
    }

    #[tokio::test]
    async fn failure_falls_back_to_samples() {
        let backend = MockBackend::new();
        backend.seed_item(listing("item-1"));
        backend.fail_next_items(BackendError::Status(503));

        let catalog = load_catalog(&backend).await;

        assert_eq!(catalog.source, CatalogSource::Samples);
        assert_eq!(catalog.items.len(), 3);
    }
}
