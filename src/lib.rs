pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::Config,
    handlers::resource_routes,
    middleware::{require_token, TokenSecret},
    models::{Branch, Category, Expense, Order, Product, Stat, Subcategory, User, Warehouse},
    store::Store,
};

pub fn create_router(store: Store, config: &Config) -> Router {
    let mut api = Router::new()
        .nest("/branches", resource_routes::<Branch>())
        .nest("/warehouses", resource_routes::<Warehouse>())
        .nest("/categories", resource_routes::<Category>())
        .nest("/subcategories", resource_routes::<Subcategory>())
        .nest("/products", resource_routes::<Product>())
        .nest("/users", resource_routes::<User>())
        .nest("/expenses", resource_routes::<Expense>())
        .nest("/orders", resource_routes::<Order>())
        .nest("/stats", resource_routes::<Stat>())
        .route("/summary", get(handlers::dashboard::summary));

    if let Some(secret) = &config.token_secret {
        api = api.layer(from_fn_with_state(TokenSecret::new(secret), require_token));
    }

    Router::new()
        .nest("/api", api)
        // Middleware
        .layer(
            ServiceBuilder::new()
                // Request spans reach env_logger through tracing's `log` feature.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(config.body_limit)),
        )
        .with_state(store)
}
