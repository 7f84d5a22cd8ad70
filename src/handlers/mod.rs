//! Resource controllers.
//!
//! Every entity gets the same four operations, written once here and
//! specialised through [`Resource`]:
//!
//! | Method | Path                 | Success | Errors        |
//! |--------|----------------------|---------|---------------|
//! | GET    | `/api/<resource>`    | 200     | 500           |
//! | POST   | `/api/<resource>`    | 201     | 400, 500      |
//! | PUT    | `/api/<resource>/:id`| 200     | 400, 404, 500 |
//! | DELETE | `/api/<resource>/:id`| 200     | 400, 404, 500 |
//!
//! Listing is unfiltered and unpaginated; the client sorts and pages.

pub mod catalog;
pub mod dashboard;
pub mod expenses;
pub mod locations;
pub mod sales;
pub mod team;

use std::future::Future;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{PayloadError, Record},
    store::Store,
};

/// A [`Record`] exposed over HTTP.
pub trait Resource: Record {
    /// Response shape. Plain entities answer with themselves; entities holding
    /// references answer with the referenced names resolved.
    type View: Serialize + Send;

    fn present(
        store: &Store,
        records: Vec<Self>,
    ) -> impl Future<Output = ApiResult<Vec<Self::View>>> + Send;

    /// The view with every reference left unresolved.
    fn unresolved(record: Self) -> Self::View;

    /// Runs after every successful write. References are never enforced, so
    /// this can only report inconsistencies, not reject them.
    fn check_references(_store: &Store, _record: &Self) -> impl Future<Output = ApiResult<()>> + Send {
        async { Ok(()) }
    }
}

pub fn resource_routes<R: Resource>() -> Router<Store> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", put(update::<R>).delete(delete::<R>))
}

pub async fn list<R: Resource>(State(store): State<Store>) -> ApiResult<Json<Vec<R::View>>> {
    let records = store.list::<R>().await?;
    let views = R::present(&store, records).await?;
    Ok(Json(views))
}

pub async fn create<R: Resource>(
    State(store): State<Store>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<R::View>)> {
    let Json(draft) = payload?;
    let record = blocking(move || R::from_draft(draft, Uuid::new_v4(), Utc::now())).await?;

    let created = store.insert(record).await?;
    info!("Created {} {}", R::LABEL, created.id());

    let view = after_write(&store, created).await;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update<R: Resource>(
    State(store): State<Store>,
    Path(id): Path<String>,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> ApiResult<Json<R::View>> {
    let id = parse_id::<R>(&id)?;
    let Json(patch) = payload?;
    let patch = blocking(move || R::prepare(patch)).await?;

    let updated = store
        .update(id, move |record: &mut R| record.apply(patch))
        .await?
        .ok_or(ApiError::NotFound(R::LABEL))?;

    let view = after_write(&store, updated).await;
    Ok(Json(view))
}

pub async fn delete<R: Resource>(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id::<R>(&id)?;

    if !store.delete::<R>(id).await? {
        return Err(ApiError::NotFound(R::LABEL));
    }
    info!("Deleted {} {}", R::LABEL, id);

    Ok(Json(json!({ "message": format!("{} deleted successfully", R::LABEL) })))
}

fn parse_id<R: Resource>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {} id: {}", R::LABEL, raw)))
}

/// Runs payload validation on the blocking pool; user payloads hash passwords.
async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PayloadError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(work).await?;
    Ok(result?)
}

/// The record is already committed, so nothing here can fail the request.
/// Lookup failures are logged and the references go unresolved.
async fn after_write<R: Resource>(store: &Store, record: R) -> R::View {
    if let Err(e) = R::check_references(store, &record).await {
        warn!("Could not check references of {} {}: {}", R::LABEL, record.id(), e);
    }

    let id = record.id();
    match R::present(store, vec![record.clone()]).await {
        Ok(mut views) => match views.pop() {
            Some(view) => view,
            None => R::unresolved(record),
        },
        Err(e) => {
            error!("Saved {} {} but could not resolve its references: {}", R::LABEL, id, e);
            R::unresolved(record)
        }
    }
}
