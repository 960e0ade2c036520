use serde::{Deserialize, Serialize};

use super::ProductId;

/// Category given to products stored without one.
pub const DEFAULT_CATEGORY: &str = "Other";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A catalog product. Prices are integer minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(rename = "img", default)]
    pub image: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Scores 1 through 5, oldest first. Only ever appended to.
    #[serde(default)]
    pub ratings: Vec<u8>,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Arithmetic mean of the ratings, `None` when nobody has rated yet.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u64 = self.ratings.iter().map(|&r| u64::from(r)).sum();
        Some(sum as f64 / self.ratings.len() as f64)
    }

    pub fn matches(&self, filter: &SearchFilter) -> bool {
        let query = filter.normalized_query();
        let query_ok = query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query);
        let category_ok = filter.category.is_empty() || self.category == filter.category;
        let featured_ok = !filter.featured_only || self.featured;

        query_ok && category_ok && featured_ok
    }

    /// Read-time projection carrying the derived average.
    pub fn view(&self) -> ProductView {
        ProductView {
            avg_rating: self.average_rating(),
            product: self.clone(),
        }
    }
}

/// A product as shown to shoppers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub avg_rating: Option<f64>,
}

/// Conjunctive product filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring of the name or the category.
    pub query: String,
    /// Exact category.
    pub category: String,
    pub featured_only: bool,
}

impl SearchFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }

    fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str, featured: bool) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            price: 500,
            image: String::new(),
            category: category.to_string(),
            ratings: Vec::new(),
            featured,
        }
    }

    #[test]
    fn average_is_absent_without_ratings() {
        assert_eq!(product("Mug", "Kitchen", false).average_rating(), None);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let mut mug = product("Mug", "Kitchen", false);
        mug.ratings = vec![5, 4, 4, 2];
        assert_eq!(mug.average_rating(), Some(3.75));
    }

    #[test]
    fn query_matches_name_or_category_ignoring_case() {
        let mug = product("Blue Mug", "Kitchen", false);
        assert!(mug.matches(&SearchFilter::query("blue")));
        assert!(mug.matches(&SearchFilter::query("KITCH")));
        assert!(mug.matches(&SearchFilter::query("  mug ")));
        assert!(!mug.matches(&SearchFilter::query("lamp")));
    }

    #[test]
    fn category_filter_is_exact() {
        let mug = product("Blue Mug", "Kitchen", false);
        assert!(mug.matches(&SearchFilter::default().in_category("Kitchen")));
        assert!(!mug.matches(&SearchFilter::default().in_category("kitchen")));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let mug = product("Blue Mug", "Kitchen", false);
        assert!(!mug.matches(&SearchFilter::query("mug").featured()));
        assert!(!mug.matches(&SearchFilter::query("mug").in_category("Garden")));

        let featured = product("Blue Mug", "Kitchen", true);
        assert!(featured.matches(&SearchFilter::query("mug").in_category("Kitchen").featured()));
    }

    #[test]
    fn stored_records_fill_in_defaults() {
        let raw = r#"{"id": 3, "name": "Lamp", "price": 1200, "img": "/lamp.png"}"#;
        let lamp: Product = serde_json::from_str(raw).unwrap();

        assert_eq!(lamp.category, DEFAULT_CATEGORY);
        assert!(lamp.ratings.is_empty());
        assert!(!lamp.featured);
        assert_eq!(lamp.image, "/lamp.png");
    }

    #[test]
    fn view_serializes_flat_with_average() {
        let mut mug = product("Mug", "Kitchen", false);
        mug.ratings = vec![4];
        let json = serde_json::to_value(mug.view()).unwrap();

        assert_eq!(json["name"], "Mug");
        assert_eq!(json["avg_rating"], 4.0);
    }
}
