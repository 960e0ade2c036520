use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Product, ProductId, DEFAULT_CATEGORY};
use super::actions::{ProductAction, ProductActionResult};
use super::dtos::{ProductCreate, ProductPatch};

const MIN_RATING: i64 = 1;
const MAX_RATING: i64 = 5;

fn validated_name(name: String) -> Result<String, FrameworkError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(FrameworkError::Validation("product name must not be empty".to_string()));
    }
    Ok(name)
}

fn category_or_default(category: Option<String>) -> String {
    match category {
        Some(category) if !category.trim().is_empty() => category.trim().to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

impl Entity for Product {
    type Id = ProductId;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    const COLLECTION: &'static str = "products";

    fn id(&self) -> &ProductId { &self.id }

    /// Next id is one past the current maximum, so deleting the newest
    /// product frees its id for the next create.
    fn assign_id(_params: &ProductCreate, existing: &[Self]) -> Result<ProductId, FrameworkError> {
        let max = existing.iter().map(|product| product.id.get()).max().unwrap_or(0);
        Ok(ProductId::new(max + 1))
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Identifier chosen by [`Entity::assign_id`]
    /// * `params` - Product creation parameters
    fn from_create(id: ProductId, params: ProductCreate) -> Result<Self, FrameworkError> {
        Ok(Self {
            id,
            name: validated_name(params.name)?,
            price: params.price,
            image: params.image,
            category: category_or_default(params.category),
            ratings: Vec::new(),
            featured: params.featured,
        })
    }

    /// Replaces only the fields present in the patch.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), FrameworkError> {
        if let Some(name) = patch.name {
            self.name = validated_name(name)?;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category {
            self.category = category_or_default(Some(category));
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Errors
    /// Returns a validation error for a score outside 1..=5.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, FrameworkError> {
        match action {
            ProductAction::AddRating(score) => {
                let score = u8::try_from(score)
                    .ok()
                    .filter(|s| (MIN_RATING..=MAX_RATING).contains(&i64::from(*s)))
                    .ok_or_else(|| {
                        FrameworkError::Validation(format!(
                            "rating must be between {MIN_RATING} and {MAX_RATING}, got {score}"
                        ))
                    })?;
                self.ratings.push(score);
                let average = self.average_rating().unwrap_or(f64::from(score));
                Ok(ProductActionResult::AddRating(average))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: u64) -> Product {
        Product::from_create(ProductId::new(id), ProductCreate::new(format!("P{id}"), 100)).unwrap()
    }

    #[test]
    fn first_product_gets_id_one() {
        assert_eq!(Product::assign_id(&ProductCreate::new("A", 1), &[]).unwrap(), ProductId::new(1));
    }

    #[test]
    fn id_is_max_plus_one_even_when_sparse() {
        let existing = vec![stored(2), stored(9), stored(4)];
        assert_eq!(Product::assign_id(&ProductCreate::new("A", 1), &existing).unwrap(), ProductId::new(10));
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = Product::from_create(ProductId::new(1), ProductCreate::new("   ", 100));
        assert!(matches!(result, Err(FrameworkError::Validation(_))));
    }

    #[test]
    fn missing_category_defaults_to_other() {
        let blank = ProductCreate::new("Lamp", 100).with_category("  ");
        assert_eq!(Product::from_create(ProductId::new(1), blank).unwrap().category, "Other");
        assert_eq!(stored(1).category, "Other");
    }

    #[test]
    fn patch_replaces_only_supplied_fields() {
        let mut product = Product::from_create(
            ProductId::new(1),
            ProductCreate::new("Lamp", 100).with_category("Office").with_image("/lamp.png"),
        )
        .unwrap();

        product
            .on_update(ProductPatch { price: Some(250), ..ProductPatch::default() })
            .unwrap();

        assert_eq!(product.price, 250);
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.category, "Office");
        assert_eq!(product.image, "/lamp.png");
    }

    #[test]
    fn ratings_out_of_range_are_rejected() {
        let mut product = stored(1);
        for score in [0, 6, -1, 300] {
            let result = product.handle_action(ProductAction::AddRating(score));
            assert!(matches!(result, Err(FrameworkError::Validation(_))), "score {score}");
        }
        assert!(product.ratings.is_empty());
    }

    #[test]
    fn rating_returns_new_average() {
        let mut product = stored(1);
        product.handle_action(ProductAction::AddRating(5)).unwrap();
        let result = product.handle_action(ProductAction::AddRating(2)).unwrap();

        assert_eq!(result, ProductActionResult::AddRating(3.5));
        assert_eq!(product.ratings, vec![5, 2]);
    }
}
