use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiResult,
    models::{Branch, Category, Expense, Order, Product, Stat, Subcategory, User, Warehouse},
    store::Store,
};

/// Record counts per collection, for the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub branches: usize,
    pub warehouses: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub products: usize,
    pub users: usize,
    pub expenses: usize,
    pub orders: usize,
    pub stats: usize,
}

pub async fn summary(State(store): State<Store>) -> ApiResult<Json<Summary>> {
    let summary = Summary {
        branches: store.count::<Branch>().await?,
        warehouses: store.count::<Warehouse>().await?,
        categories: store.count::<Category>().await?,
        subcategories: store.count::<Subcategory>().await?,
        products: store.count::<Product>().await?,
        users: store.count::<User>().await?,
        expenses: store.count::<Expense>().await?,
        orders: store.count::<Order>().await?,
        stats: store.count::<Stat>().await?,
    };

    Ok(Json(summary))
}
