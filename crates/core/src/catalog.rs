//! Catalog projection: products joined with their per-size inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::stock::{StockBound, StockError};
use crate::types::{Price, ProductId, SizeLabel};

/// Stock for one `(product, size)` pair.
///
/// A size with no slot counts as zero stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub product_id: ProductId,
    pub size: SizeLabel,
    pub stock: u32,
}

/// A product as stored, without inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    /// Ordered image URIs; the first one is the cover.
    pub images: Vec<String>,
    pub category: Option<String>,
    /// Free-text label used by the listing filter.
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Cover image, if any.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A product with its inventory slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    #[serde(flatten)]
    pub product: Product,
    pub inventory: Vec<InventorySlot>,
}

/// One entry of the size picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeAvailability {
    pub size: SizeLabel,
    pub stock: u32,
    pub available: bool,
}

impl CatalogProduct {
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Stock for `size`, zero when the product has no such slot.
    #[must_use]
    pub fn stock_for(&self, size: &SizeLabel) -> u32 {
        self.inventory
            .iter()
            .find(|slot| slot.size == *size)
            .map_or(0, |slot| slot.stock)
    }

    /// Sizes in chart order, each flagged available or sold out.
    #[must_use]
    pub fn sizes(&self) -> Vec<SizeAvailability> {
        let mut sizes: Vec<SizeAvailability> = self
            .inventory
            .iter()
            .map(|slot| SizeAvailability {
                size: slot.size.clone(),
                stock: slot.stock,
                available: slot.stock > 0,
            })
            .collect();
        sizes.sort_by(|a, b| a.size.chart_cmp(&b.size));
        sizes
    }

    /// Resolve the quantity range for `size`.
    #[must_use]
    pub fn stock_bound(&self, size: &SizeLabel) -> StockBound {
        StockBound::resolve(&self.inventory, self.product.id, size)
    }

    /// Validate a size/quantity pick and snapshot it as a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::NoSizeSelected`] when `size` is missing or blank,
    /// otherwise whatever [`StockBound::admit`] rejects.
    pub fn select(&self, size: Option<&str>, quantity: u32) -> Result<CartLine, StockError> {
        let size = size
            .and_then(|s| SizeLabel::parse(s).ok())
            .ok_or(StockError::NoSizeSelected)?;
        let quantity = self.stock_bound(&size).admit(&size, quantity)?;

        Ok(CartLine {
            product_id: self.product.id,
            name: self.product.name.clone(),
            price: self.product.price,
            size,
            quantity,
            image: self.product.cover_image().map(str::to_owned),
        })
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl CatalogFilter {
    /// Category that lists the whole catalog.
    pub const ALL_CATEGORY: &'static str = "jeans";
    /// Tag value meaning "no tag filter".
    pub const ALL_TAGS: &'static str = "all";

    /// Category to filter on, `None` for the catch-all.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self.category.as_deref().map(str::trim) {
            None | Some("" | Self::ALL_CATEGORY) => None,
            Some(wanted) => Some(wanted),
        }
    }

    /// Tag to filter on, `None` for "all".
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self.tag.as_deref().map(str::trim) {
            None | Some("" | Self::ALL_TAGS) => None,
            Some(wanted) => Some(wanted),
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category()
            .is_none_or(|wanted| product.category.as_deref() == Some(wanted));
        let tag_ok = self
            .tag()
            .is_none_or(|wanted| product.tag.as_deref() == Some(wanted));
        category_ok && tag_ok
    }

    /// Keep the products this filter matches, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [CatalogProduct]) -> Vec<&'a CatalogProduct> {
        products.iter().filter(|p| self.matches(&p.product)).collect()
    }
}

/// Distinct non-empty tags, sorted, for the tag dropdown.
#[must_use]
pub fn distinct_tags<'a, I>(products: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CatalogProduct>,
{
    let mut tags: Vec<String> = products
        .into_iter()
        .filter_map(|p| p.product.tag.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Admin search: case-insensitive name match or id substring.
#[must_use]
pub fn search<'a>(products: &'a [CatalogProduct], term: &str) -> Vec<&'a CatalogProduct> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.product.name.to_lowercase().contains(&needle)
                || p.product.id.to_string().contains(&needle)
        })
        .collect()
}
