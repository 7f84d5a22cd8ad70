use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::handlers::dashboard::Summary;
use crate::models::{
    Branch, BranchPatch, Category, CategoryPatch, Expense, ExpensePatch, NewBranch, NewCategory,
    NewExpense, NewOrder, NewProduct, NewStat, NewSubcategory, NewUser, NewWarehouse, Order,
    OrderPatch, ProductPatch, ProductView, Stat, StatPatch, SubcategoryPatch, SubcategoryView,
    User, UserPatch, Warehouse, WarehousePatch,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status and a `{ message }` body.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("sign-out failed: {0}")]
    SignOut(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// An entity as the dashboard sees it: the response shape of one
/// `/api/<resource>` collection plus the payloads it accepts.
pub trait ClientResource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const PATH: &'static str;
    const LABEL: &'static str;

    type Draft: Serialize + Sync;
    type Patch: Serialize + Sync;

    fn id(&self) -> Uuid;
}

macro_rules! client_resource {
    ($view:ty, $path:literal, $label:literal, $draft:ty, $patch:ty) => {
        impl ClientResource for $view {
            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;

            type Draft = $draft;
            type Patch = $patch;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

client_resource!(Branch, "branches", "Branch", NewBranch, BranchPatch);
client_resource!(Warehouse, "warehouses", "Warehouse", NewWarehouse, WarehousePatch);
client_resource!(Category, "categories", "Category", NewCategory, CategoryPatch);
client_resource!(SubcategoryView, "subcategories", "Subcategory", NewSubcategory, SubcategoryPatch);
client_resource!(ProductView, "products", "Product", NewProduct, ProductPatch);
client_resource!(User, "users", "User", NewUser, UserPatch);
client_resource!(Expense, "expenses", "Expense", NewExpense, ExpensePatch);
client_resource!(Order, "orders", "Order", NewOrder, OrderPatch);
client_resource!(Stat, "stats", "Stat", NewStat, StatPatch);

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Typed HTTP client for the `/api` surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: ClientResource>(&self) -> String {
        format!("{}/api/{}", self.base_url, R::PATH)
    }

    fn record_url<R: ClientResource>(&self, id: Uuid) -> String {
        format!("{}/api/{}/{}", self.base_url, R::PATH, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn list<R: ClientResource>(&self) -> Result<Vec<R>, ClientError> {
        let request = self.authorize(self.http.get(self.collection_url::<R>()));
        read(request.send().await?).await
    }

    pub async fn create<R: ClientResource>(&self, draft: &R::Draft) -> Result<R, ClientError> {
        let request = self.authorize(self.http.post(self.collection_url::<R>()).json(draft));
        read(request.send().await?).await
    }

    pub async fn update<R: ClientResource>(
        &self,
        id: Uuid,
        patch: &R::Patch,
    ) -> Result<R, ClientError> {
        let request = self.authorize(self.http.put(self.record_url::<R>(id)).json(patch));
        read(request.send().await?).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete<R: ClientResource>(&self, id: Uuid) -> Result<String, ClientError> {
        let request = self.authorize(self.http.delete(self.record_url::<R>(id)));
        let body: MessageBody = read(request.send().await?).await?;
        Ok(body.message)
    }

    pub async fn summary(&self) -> Result<Summary, ClientError> {
        let request = self.authorize(self.http.get(format!("{}/api/summary", self.base_url)));
        read(request.send().await?).await
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<MessageBody>().await {
        Ok(body) => body.message,
        Err(_) => fallback_message(status),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
