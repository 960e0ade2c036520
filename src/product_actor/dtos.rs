// DTOs for Product
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: u64,
    pub image: String,
    /// Blank or absent becomes the default category.
    pub category: Option<String>,
    pub featured: bool,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
            image: String::new(),
            category: None,
            featured: false,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}

/// Fields to replace. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}
