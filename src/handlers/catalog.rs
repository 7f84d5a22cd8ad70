//! Categories, subcategories and products: the one corner of the model with
//! references. Responses resolve referenced names; writes with dangling or
//! mismatched references are accepted and logged.

use std::collections::HashMap;

use log::warn;

use crate::{
    error::ApiResult,
    models::{Category, Product, ProductView, Subcategory, SubcategoryView},
    store::Store,
};

use super::Resource;

impl Resource for Category {
    type View = Category;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Category>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Category {
        record
    }
}

impl Resource for Subcategory {
    type View = SubcategoryView;

    async fn present(store: &Store, records: Vec<Self>) -> ApiResult<Vec<SubcategoryView>> {
        let category_names = store.names::<Category>().await?;
        Ok(records
            .into_iter()
            .map(|sub| SubcategoryView::resolve(sub, &category_names))
            .collect())
    }

    fn unresolved(record: Self) -> SubcategoryView {
        SubcategoryView::resolve(record, &HashMap::new())
    }

    async fn check_references(store: &Store, record: &Self) -> ApiResult<()> {
        if store.find::<Category>(record.category).await?.is_none() {
            warn!(
                "Subcategory {} references missing category {}",
                record.id, record.category
            );
        }
        Ok(())
    }
}

impl Resource for Product {
    type View = ProductView;

    async fn present(store: &Store, records: Vec<Self>) -> ApiResult<Vec<ProductView>> {
        let category_names = store.names::<Category>().await?;
        let subcategory_names = store.names::<Subcategory>().await?;
        Ok(records
            .into_iter()
            .map(|product| ProductView::resolve(product, &category_names, &subcategory_names))
            .collect())
    }

    fn unresolved(record: Self) -> ProductView {
        ProductView::resolve(record, &HashMap::new(), &HashMap::new())
    }

    async fn check_references(store: &Store, record: &Self) -> ApiResult<()> {
        let category = store.find::<Category>(record.category).await?;
        let subcategory = store.find::<Subcategory>(record.subcategory).await?;
        if let Some(problem) = record.hierarchy_mismatch(category.as_ref(), subcategory.as_ref()) {
            warn!("Product {} is inconsistent: {}", record.id, problem);
        }
        Ok(())
    }
}
