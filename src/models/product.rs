use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{money, nullable, Category, PayloadError, Record, Reference, Required, Subcategory};

/// Precision of the `price` column.
pub const PRICE_PRECISION: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "category_id")]
    pub category: Uuid,
    #[sqlx(rename = "subcategory_id")]
    pub subcategory: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: Option<String>,
    pub category: Option<Uuid>,
    pub subcategory: Option<Uuid>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Uuid>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// Response shape with category and subcategory names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub category: Reference,
    pub subcategory: Reference,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    pub fn resolve(
        product: Product,
        category_names: &HashMap<Uuid, String>,
        subcategory_names: &HashMap<Uuid, String>,
    ) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category: Reference {
                id: product.category,
                name: category_names.get(&product.category).cloned(),
            },
            subcategory: Reference {
                id: product.subcategory,
                name: subcategory_names.get(&product.subcategory).cloned(),
            },
            price: product.price,
            stock: product.stock,
            description: product.description,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl Product {
    /// Describes every way the product's category and subcategory fail to form
    /// a valid chain, or `None` when both exist and the subcategory sits under
    /// the category.
    pub fn hierarchy_mismatch(
        &self,
        category: Option<&Category>,
        subcategory: Option<&Subcategory>,
    ) -> Option<String> {
        let mut problems = Vec::new();
        if category.is_none() {
            problems.push(format!("category {} does not exist", self.category));
        }
        match subcategory {
            None => problems.push(format!("subcategory {} does not exist", self.subcategory)),
            Some(sub) if sub.category != self.category => problems.push(format!(
                "subcategory {} belongs to category {}, not {}",
                sub.id, sub.category, self.category
            )),
            Some(_) => {}
        }

        if problems.is_empty() {
            None
        } else {
            Some(problems.join("; "))
        }
    }
}

impl Record for Product {
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "Product";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "category_id",
        "subcategory_id",
        "price",
        "stock",
        "description",
    ];
    const UNIQUE: Option<&'static str> = Some("name");

    type Draft = NewProduct;
    type Patch = ProductPatch;

    fn from_draft(draft: NewProduct, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let mut product = Product {
            id,
            name: required.text("name", draft.name),
            category: required.value("category", draft.category),
            subcategory: required.value("subcategory", draft.subcategory),
            price: required.value("price", draft.price),
            stock: required.value("stock", draft.stock),
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        product = required.finish(product)?;
        product.price = money("price", product.price, PRICE_PRECISION)?;
        Ok(product)
    }

    fn prepare(mut patch: ProductPatch) -> Result<ProductPatch, PayloadError> {
        patch.price = patch
            .price
            .map(|price| money("price", price, PRICE_PRECISION))
            .transpose()?;
        Ok(patch)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn unique_value(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(subcategory) = patch.subcategory {
            self.subcategory = subcategory;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.category);
        row.push_bind(self.subcategory);
        row.push_bind(self.price);
        row.push_bind(self.stock);
        row.push_bind(self.description.clone());
    }
}
