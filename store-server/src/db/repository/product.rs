//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Storefront/admin listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Only discounted products
    pub on_sale: bool,
    /// Only featured products
    pub featured: bool,
    pub limit: i32,
    pub offset: i32,
}

/// Resolve the discount invariant from an undiscounted base price.
///
/// Returns `(price, original_price, discount_percentage)`.
fn discounted_fields(base: f64, percentage: f64) -> (f64, Option<f64>, f64) {
    if percentage > 0.0 {
        (round2(base * (1.0 - percentage / 100.0)), Some(base), percentage)
    } else {
        (base, None, 0.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find active products matching the filter, newest first
    pub async fn find_all(&self, filter: &ProductFilter) -> RepoResult<Vec<Product>> {
        let mut query = String::from("SELECT * FROM product WHERE is_active = true");
        if filter.category.is_some() {
            query.push_str(" AND category = $category");
        }
        if filter.brand.is_some() {
            query.push_str(" AND brand = $brand");
        }
        if filter.search.is_some() {
            query.push_str(" AND string::lowercase(name) CONTAINS string::lowercase($search)");
        }
        if filter.on_sale {
            query.push_str(" AND discount_percentage > 0");
        }
        if filter.featured {
            query.push_str(" AND is_featured = true");
        }
        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT {} START {}",
            filter.limit.max(1),
            filter.offset.max(0)
        ));

        let mut q = self.base.db().query(query);
        if let Some(category) = filter.category.clone() {
            q = q.bind(("category", category));
        }
        if let Some(brand) = filter.brand.clone() {
            q = q.bind(("brand", brand));
        }
        if let Some(search) = filter.search.clone() {
            q = q.bind(("search", search));
        }

        let products: Vec<Product> = q.await?.take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = record_id(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// Find products for a set of references, preserving only those that exist
    pub async fn find_by_record_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0.0 {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        if data.stock < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            original_price: None,
            discount_percentage: 0.0,
            stock: data.stock,
            category: data.category,
            brand: data.brand,
            sizes: data.sizes.unwrap_or_default(),
            images: data.images.unwrap_or_default(),
            is_featured: data.is_featured.unwrap_or(false),
            is_active: true,
            created_at: Some(now_rfc3339()),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    ///
    /// `price` carries the undiscounted price; when a discount is active
    /// (existing or given), the sell price is re-derived from it.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        // Resolve the discount invariant against the current record
        let (price, original_price, discount_percentage) =
            match (data.price, data.discount_percentage) {
                (None, None) => (
                    existing.price,
                    existing.original_price,
                    existing.discount_percentage,
                ),
                (new_price, new_pct) => {
                    let pct = new_pct.unwrap_or(existing.discount_percentage);
                    if !(0.0..100.0).contains(&pct) {
                        return Err(RepoError::Validation(
                            "discount_percentage must be in [0, 100)".into(),
                        ));
                    }
                    let base =
                        new_price.unwrap_or_else(|| existing.original_price.unwrap_or(existing.price));
                    discounted_fields(base, pct)
                }
            };

        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            // Pricing triple is always written so clearing a discount
            // nulls original_price
            price: f64,
            original_price: Option<f64>,
            discount_percentage: f64,
            #[serde(skip_serializing_if = "Option::is_none")]
            stock: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            brand: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sizes: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            images: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_featured: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = ProductUpdateDb {
            name: data.name,
            description: data.description,
            price,
            original_price,
            discount_percentage,
            stock: data.stock,
            category: data.category,
            brand: data.brand,
            sizes: data.sizes,
            images: data.images,
            is_featured: data.is_featured,
            is_active: data.is_active,
        };

        let rid = record_id(PRODUCT_TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", rid.clone()))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product (historic order snapshots keep their copy)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(PRODUCT_TABLE, id);
        let result: Option<Product> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Apply (or clear, with percentage 0) a discount across the listed
    /// products, optionally narrowed to one brand or one category.
    ///
    /// Returns the number of products updated.
    pub async fn apply_bulk_discount(
        &self,
        ids: &[String],
        percentage: f64,
        brand: Option<&str>,
        category: Option<&str>,
    ) -> RepoResult<usize> {
        if ids.is_empty() {
            return Err(RepoError::Validation("product_ids cannot be empty".into()));
        }
        if !(0.0..100.0).contains(&percentage) {
            return Err(RepoError::Validation(
                "discount_percentage must be in [0, 100)".into(),
            ));
        }

        let things: Vec<RecordId> = ids.iter().map(|id| record_id(PRODUCT_TABLE, id)).collect();
        let mut query = String::from("SELECT * FROM product WHERE id IN $ids");
        if brand.is_some() {
            query.push_str(" AND brand = $brand");
        }
        if category.is_some() {
            query.push_str(" AND category = $category");
        }

        let mut q = self.base.db().query(query).bind(("ids", things));
        if let Some(brand) = brand {
            q = q.bind(("brand", brand.to_string()));
        }
        if let Some(category) = category {
            q = q.bind(("category", category.to_string()));
        }
        let products: Vec<Product> = q.await?.take(0)?;

        let mut updated = 0usize;
        for product in products {
            let Some(pid) = product.id.clone() else {
                continue;
            };
            // Re-derive from the stored undiscounted price so repeated
            // applications never compound
            let base = product.original_price.unwrap_or(product.price);
            let (price, original_price, discount_percentage) =
                discounted_fields(base, percentage);

            self.base
                .db()
                .query(
                    "UPDATE $thing MERGE { price: $price, original_price: $original_price, discount_percentage: $discount_percentage }",
                )
                .bind(("thing", pid))
                .bind(("price", price))
                .bind(("original_price", original_price))
                .bind(("discount_percentage", discount_percentage))
                .await?;
            updated += 1;
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discounted_fields_applies_percentage() {
        let (price, original, pct) = discounted_fields(80.0, 25.0);
        assert_eq!(price, 60.0);
        assert_eq!(original, Some(80.0));
        assert_eq!(pct, 25.0);
    }

    #[test]
    fn test_discounted_fields_rounds_to_cents() {
        let (price, _, _) = discounted_fields(19.99, 10.0);
        assert_eq!(price, 17.99);
    }

    #[test]
    fn test_discounted_fields_zero_restores_base() {
        let (price, original, pct) = discounted_fields(80.0, 0.0);
        assert_eq!(price, 80.0);
        assert_eq!(original, None);
        assert_eq!(pct, 0.0);
    }
}
