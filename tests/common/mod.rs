#![allow(dead_code)]

use std::collections::HashMap;

use stockroom::{config::Config, create_router, store::Store};

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(&[]).await
    }

    /// Same router as prod over a fresh memory store, bound to an ephemeral port.
    pub async fn spawn_with(vars: &[(&str, &str)]) -> Self {
        Self::serve(Store::memory(), vars).await
    }

    pub async fn spawn_over(store: Store) -> Self {
        Self::serve(store, &[]).await
    }

    async fn serve(store: Store, vars: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.entry("DATABASE_URL".to_string())
            .or_insert_with(|| "memory".to_string());
        let config = Config::from_lookup(|name| env.get(name).cloned()).expect("test config");

        let app = create_router(store, &config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
