/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Appends a shopper's score to the ratings.
    ///
    /// # Errors
    /// Fails with a validation error unless the score is an integer in 1..=5.
    AddRating(i64),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// New average rating after the score was recorded.
    AddRating(f64),
}
