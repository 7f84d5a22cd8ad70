mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::TestServer;

/// One valid create payload per collection.
fn valid_payloads() -> Vec<(&'static str, Value)> {
    vec![
        ("branches", json!({ "name": "Downtown", "location": "Main St", "contact": "555-0100" })),
        ("warehouses", json!({ "name": "North", "location": "Dock 4", "contact": "555-0101" })),
        ("categories", json!({ "name": "Beverages" })),
        ("subcategories", json!({ "name": "Soda", "category": Uuid::new_v4() })),
        (
            "products",
            json!({
                "name": "Cola",
                "category": Uuid::new_v4(),
                "subcategory": Uuid::new_v4(),
                "price": 1.5,
                "stock": 10,
            }),
        ),
        (
            "users",
            json!({
                "name": "Dana",
                "email": "dana@example.com",
                "password": "hunter2",
                "role": "Admin",
                "phone": "555-0102",
            }),
        ),
        ("expenses", json!({ "name": "Rent", "amount": 1200 })),
        (
            "orders",
            json!({ "saleID": "S-1", "branchName": "Downtown", "customerName": "Ada", "amount": 20 }),
        ),
        ("stats", json!({ "title": "Revenue", "value": 1000, "isCurrency": true })),
    ]
}

async fn list(client: &reqwest::Client, server: &TestServer, resource: &str) -> Vec<Value> {
    let res = client
        .get(server.url(&format!("/api/{resource}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn create(client: &reqwest::Client, server: &TestServer, resource: &str, body: &Value) -> Value {
    let res = client
        .post(server.url(&format!("/api/{resource}")))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "create {resource}");
    res.json().await.unwrap()
}

#[tokio::test]
async fn create_then_list_branch() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(
        &client,
        &server,
        "branches",
        &json!({ "name": "A", "location": "B", "contact": "C" }),
    )
    .await;

    let branches = list(&client, &server, "branches").await;
    assert_eq!(branches.len(), 1);

    let branch = &branches[0];
    assert_eq!(branch["name"], "A");
    assert_eq!(branch["location"], "B");
    assert_eq!(branch["contact"], "C");
    assert_eq!(branch["id"], created["id"]);
    assert!(Uuid::parse_str(branch["id"].as_str().unwrap()).is_ok());
    assert!(branch["createdAt"].is_string());
    assert!(branch["updatedAt"].is_string());
}

#[tokio::test]
async fn missing_required_field_is_rejected_for_every_collection() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (resource, _) in valid_payloads() {
        let res = client
            .post(server.url(&format!("/api/{resource}")))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{resource}");

        let body: Value = res.json().await.unwrap();
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Missing required fields"), "{resource}: {message}");

        assert!(list(&client, &server, resource).await.is_empty(), "{resource}");
    }
}

#[tokio::test]
async fn every_collection_supports_full_crud() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (resource, payload) in valid_payloads() {
        let created = create(&client, &server, resource, &payload).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(list(&client, &server, resource).await.len(), 1, "{resource}");

        let res = client
            .put(server.url(&format!("/api/{resource}/{id}")))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "update {resource}");

        let res = client
            .delete(server.url(&format!("/api/{resource}/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "delete {resource}");
        let body: Value = res.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().ends_with("deleted successfully"));

        assert!(list(&client, &server, resource).await.is_empty(), "{resource}");
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found_for_every_collection() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let missing = Uuid::new_v4();

    for (resource, payload) in valid_payloads() {
        let res = client
            .put(server.url(&format!("/api/{resource}/{missing}")))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "update {resource}");
        let body: Value = res.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().ends_with("not found"));

        let res = client
            .delete(server.url(&format!("/api/{resource}/{missing}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "delete {resource}");
    }
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .delete(server.url("/api/branches/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Branch id: not-a-uuid");
}

#[tokio::test]
async fn duplicate_category_name_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create(&client, &server, "categories", &json!({ "name": "Beverages" })).await;

    let res = client
        .post(server.url("/api/categories"))
        .json(&json!({ "name": "Beverages" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("duplicate key"));

    assert_eq!(list(&client, &server, "categories").await.len(), 1);
}

#[tokio::test]
async fn product_stock_can_be_set_to_zero() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create(&client, &server, "categories", &json!({ "name": "Beverages" })).await;
    let subcategory = create(
        &client,
        &server,
        "subcategories",
        &json!({ "name": "Soda", "category": category["id"] }),
    )
    .await;
    let product = create(
        &client,
        &server,
        "products",
        &json!({
            "name": "Cola",
            "category": category["id"],
            "subcategory": subcategory["id"],
            "price": 1.25,
            "stock": 40,
            "description": "Cold",
        }),
    )
    .await;
    assert_eq!(product["category"]["name"], "Beverages");
    assert_eq!(product["subcategory"]["name"], "Soda");

    let id = product["id"].as_str().unwrap();
    let res = client
        .put(server.url(&format!("/api/products/{id}")))
        .json(&json!({ "stock": 0, "description": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["stock"], 0);
    assert_eq!(updated["description"], "");
    assert_eq!(updated["price"], 1.25);
    assert_eq!(updated["name"], "Cola");

    let products = list(&client, &server, "products").await;
    assert_eq!(products[0]["stock"], 0);
}

#[tokio::test]
async fn subcategory_with_unknown_category_has_no_category_name() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let missing = Uuid::new_v4();

    let created = create(
        &client,
        &server,
        "subcategories",
        &json!({ "name": "Orphan", "category": missing }),
    )
    .await;
    assert_eq!(created["category"]["id"], missing.to_string());
    assert!(created["category"]["name"].is_null());

    let subcategories = list(&client, &server, "subcategories").await;
    assert_eq!(subcategories.len(), 1);
    assert!(subcategories[0]["category"]["name"].is_null());
}

#[tokio::test]
async fn deleting_a_category_leaves_children_dangling() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create(&client, &server, "categories", &json!({ "name": "Snacks" })).await;
    let subcategory = create(
        &client,
        &server,
        "subcategories",
        &json!({ "name": "Chips", "category": category["id"] }),
    )
    .await;
    create(
        &client,
        &server,
        "products",
        &json!({
            "name": "Salted",
            "category": category["id"],
            "subcategory": subcategory["id"],
            "price": 2,
            "stock": 5,
        }),
    )
    .await;

    let id = category["id"].as_str().unwrap();
    let res = client
        .delete(server.url(&format!("/api/categories/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let subcategories = list(&client, &server, "subcategories").await;
    assert_eq!(subcategories.len(), 1);
    assert_eq!(subcategories[0]["category"]["id"], category["id"]);
    assert!(subcategories[0]["category"]["name"].is_null());

    let products = list(&client, &server, "products").await;
    assert_eq!(products.len(), 1);
    assert!(products[0]["category"]["name"].is_null());
    assert_eq!(products[0]["subcategory"]["name"], "Chips");
}

#[tokio::test]
async fn users_never_expose_passwords() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, payload) = valid_payloads().into_iter().find(|(r, _)| *r == "users").unwrap();
    let created = create(&client, &server, "users", &payload).await;
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());
    assert_eq!(created["role"], "Admin");

    let res = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": "Eve",
            "email": "dana@example.com",
            "password": "x",
            "role": "Admin",
            "phone": "1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "email is unique");

    let res = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": "Mallory",
            "email": "m@example.com",
            "password": "x",
            "role": "Owner",
            "phone": "1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "role is enumerated");
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn order_status_defaults_to_pending_and_can_change() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let order = create(
        &client,
        &server,
        "orders",
        &json!({ "saleID": "S-9", "branchName": "Downtown", "customerName": "Ada", "amount": 9.5 }),
    )
    .await;
    assert_eq!(order["status"], "Pending");

    let id = order["id"].as_str().unwrap();
    let res = client
        .put(server.url(&format!("/api/orders/{id}")))
        .json(&json!({ "status": "Completed" }))
        .send()
        .await
        .unwrap();
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "Completed");
    assert_eq!(updated["saleID"], "S-9");
}

#[tokio::test]
async fn summary_counts_each_collection() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create(&client, &server, "categories", &json!({ "name": "A" })).await;
    create(&client, &server, "categories", &json!({ "name": "B" })).await;
    create(&client, &server, "expenses", &json!({ "name": "Fuel", "amount": 30, "date": "2024-02-01" })).await;

    let res = client.get(server.url("/api/summary")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let summary: Value = res.json().await.unwrap();
    assert_eq!(summary["categories"], 2);
    assert_eq!(summary["expenses"], 1);
    assert_eq!(summary["products"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_with_message() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/branches"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn token_secret_guards_the_api() {
    let server = TestServer::spawn_with(&[("API_TOKEN_SECRET", "test-secret")]).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/branches")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Missing bearer token");

    let forged = stockroom::utils::create_token("other-secret", "admin", chrono::Duration::hours(1)).unwrap();
    let res = client
        .get(server.url("/api/branches"))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = stockroom::utils::create_token("test-secret", "admin", chrono::Duration::hours(1)).unwrap();
    let res = client
        .get(server.url("/api/branches"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn category_and_subcategory(client: &reqwest::Client, server: &TestServer) -> (Value, Value) {
    let category = create(client, server, "categories", &json!({ "name": "Marine" })).await;
    let subcategory = create(
        client,
        server,
        "subcategories",
        &json!({ "name": "Boats", "category": category["id"] }),
    )
    .await;
    (category, subcategory)
}

#[tokio::test]
async fn money_out_of_column_range_is_a_bad_request() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (category, subcategory) = category_and_subcategory(&client, &server).await;

    let res = client
        .post(server.url("/api/products"))
        .json(&json!({
            "name": "Yacht",
            "category": category["id"],
            "subcategory": subcategory["id"],
            "price": 1e12,
            "stock": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("price is out of range"));
    assert!(list(&client, &server, "products").await.is_empty());

    let dinghy = create(
        &client,
        &server,
        "products",
        &json!({
            "name": "Dinghy",
            "category": category["id"],
            "subcategory": subcategory["id"],
            "price": 900,
            "stock": 1,
        }),
    )
    .await;
    let id = dinghy["id"].as_str().unwrap();
    let res = client
        .put(server.url(&format!("/api/products/{id}")))
        .json(&json!({ "price": 1e12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&client, &server, "products").await[0]["price"], 900.0);

    let res = client
        .post(server.url("/api/expenses"))
        .json(&json!({ "name": "Fleet", "amount": -1e11 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn money_is_stored_in_cents() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (category, subcategory) = category_and_subcategory(&client, &server).await;

    let product = create(
        &client,
        &server,
        "products",
        &json!({
            "name": "Rope",
            "category": category["id"],
            "subcategory": subcategory["id"],
            "price": 1.255,
            "stock": 3,
        }),
    )
    .await;
    assert_eq!(product["price"], 1.26);

    let id = product["id"].as_str().unwrap();
    let res = client
        .put(server.url(&format!("/api/products/{id}")))
        .json(&json!({ "price": 0.125 }))
        .send()
        .await
        .unwrap();
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["price"], 0.13);

    let stat = create(&client, &server, "stats", &json!({ "title": "Margin", "value": 12.345 })).await;
    assert_eq!(stat["value"], 12.35);
}

#[tokio::test]
async fn password_hashing_does_not_stall_other_requests() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let signup = tokio::spawn({
        let client = client.clone();
        let url = server.url("/api/users");
        async move {
            client
                .post(url)
                .json(&json!({
                    "name": "Dana",
                    "email": "dana@example.com",
                    "password": "hunter2",
                    "role": "Admin",
                    "phone": "555-0102",
                }))
                .send()
                .await
                .unwrap()
                .status()
        }
    });
    // Let the create reach the handler and start hashing.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    // Single-threaded test runtime: this only completes if hashing runs elsewhere.
    let res = client.get(server.url("/api/branches")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!signup.is_finished(), "listing waited for the password hash");

    assert_eq!(signup.await.unwrap(), StatusCode::CREATED);
}

#[tokio::test]
async fn hostnames_bind() {
    let config = stockroom::config::Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some("memory".to_string()),
        "HOST" => Some("localhost".to_string()),
        "PORT" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await.unwrap();
    assert!(listener.local_addr().unwrap().ip().is_loopback());
}
