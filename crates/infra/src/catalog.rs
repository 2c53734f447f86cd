//! Part catalog service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use sims_inventory::{NewPart, Part};

use crate::error::ServiceError;
use crate::store::InventoryStore;

/// Adds and lists spare parts.
#[derive(Clone)]
pub struct PartCatalog {
    store: Arc<dyn InventoryStore>,
}

impl PartCatalog {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Validate and insert a part. `total_price` is computed once, here.
    #[instrument(skip(self, part), fields(name = %part.name, category = %part.category), err)]
    pub async fn add_part(&self, part: NewPart) -> Result<Part, ServiceError> {
        part.validate()?;
        let part = self.store.insert_part(part, Utc::now()).await?;
        info!(part_id = %part.id, quantity = part.quantity, "spare part added");
        Ok(part)
    }

    /// Every part, newest first.
    pub async fn list_parts(&self) -> Result<Vec<Part>, ServiceError> {
        Ok(self.store.list_parts().await?)
    }
}

#[cfg(test)]
mod tests {
    use sims_core::DomainError;
    use sims_inventory::Category;

    use super::*;
    use crate::store::InMemoryInventoryStore;

    fn catalog() -> PartCatalog {
        PartCatalog::new(Arc::new(InMemoryInventoryStore::new()))
    }

    #[tokio::test]
    async fn invalid_part_is_not_stored() {
        let catalog = catalog();
        let err = catalog
            .add_part(NewPart { name: "Oil Filter 2".into(), category: Category::Engine, quantity: 1, unit_price: 1.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(catalog.list_parts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_part_carries_total_price() {
        let catalog = catalog();
        let part = catalog
            .add_part(NewPart { name: "Brake Pad".into(), category: Category::Brakes, quantity: 20, unit_price: 5.0 })
            .await
            .unwrap();
        assert_eq!(part.total_price, 100.0);
        assert_eq!(catalog.list_parts().await.unwrap(), vec![part]);
    }
}
