use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Catalog, Product, ProductId, ProductView, SearchFilter};
use crate::product_actor::{ProductAction, ProductActionResult, ProductCreate, ProductError, ProductPatch};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductId, ProductError, product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.inner.create(params).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Removes the product. Carts, wishlists and orders that still mention
    /// it are left alone.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        debug!("Sending request");
        Ok(self.inner.delete(id).await?)
    }

    /// Like `get_product`, but a missing product is an error.
    #[instrument(skip(self))]
    pub async fn require_product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.get_product(id).await?.ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// A point-in-time copy of the whole catalog.
    #[instrument(skip(self))]
    pub async fn catalog(&self) -> Result<Catalog, ProductError> {
        Ok(Catalog::new(self.list_products().await?))
    }

    #[instrument(skip(self))]
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProductView>, ProductError> {
        let results = self.catalog().await?.search(filter);
        debug!(result_count = results.len(), "Search complete");
        Ok(results)
    }

    /// Records a score and returns the new average.
    #[instrument(skip(self))]
    pub async fn add_rating(&self, id: ProductId, score: i64) -> Result<f64, ProductError> {
        debug!("Sending request");
        let ProductActionResult::AddRating(average) =
            self.inner.perform_action(id, ProductAction::AddRating(score)).await?;
        Ok(average)
    }
}
