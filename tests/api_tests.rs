//! # API Integration Tests
//!
//! Drives the router end to end against the in-memory document store.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kochliste::kitchen::Kitchen;
use kochliste::server::{router, AppState};
use kochliste::storage::{BlobStore, MemoryStore, RECIPES_KEY, TO_BE_BOUGHT_KEY, TO_BE_COOKED_KEY};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const CATALOG: &str = r#"{
  "rezepte": [
    { "name": "Brot", "zutaten": ["500g Mehl", "1 Würfel Hefe", "Salz"] },
    { "name": "Kuchen", "zutaten": ["200g Mehl", "3 Eier", "½ TL Zimt"] }
  ]
}"#;

struct TestApp {
    store: Arc<MemoryStore>,
    static_dir: TempDir,
}

impl TestApp {
    fn new(documents: &[(&str, &str)]) -> Self {
        let store = Arc::new(MemoryStore::with_documents(
            documents.iter().map(|(k, v)| (*k, *v)),
        ));
        Self {
            store,
            static_dir: TempDir::new().unwrap(),
        }
    }

    fn router(&self) -> Router {
        let kitchen = Kitchen::new(self.store.clone());
        router(AppState::new(kitchen, self.static_dir.path()))
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> Value {
        let (status, body) = self.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "GET {uri} failed: {body}");
        body
    }
}

async fn cook_recipe(app: &TestApp, index: usize) {
    let recipes = app.get("/api/rezepte").await;
    let (status, body) = app
        .send(Method::POST, "/api/to-be-cooked", Some(recipes[index].clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_recipes_get_positional_ids() {
    let app = TestApp::new(&[(RECIPES_KEY, CATALOG)]);

    let recipes = app.get("/api/rezepte").await;

    assert_eq!(recipes[0]["id"], 1);
    assert_eq!(recipes[1]["id"], 2);
    assert_eq!(recipes[1]["zutaten"][2], "½ TL Zimt");
}

#[tokio::test]
async fn test_empty_store_returns_empty_lists() {
    let app = TestApp::new(&[]);

    assert_eq!(app.get("/api/rezepte").await, json!([]));
    assert_eq!(app.get("/api/to-be-cooked").await, json!([]));
    assert_eq!(app.get("/api/to-be-bought").await, json!([]));
}

#[tokio::test]
async fn test_cooking_two_recipes_merges_ingredients() {
    let app = TestApp::new(&[(RECIPES_KEY, CATALOG)]);

    cook_recipe(&app, 0).await;
    cook_recipe(&app, 1).await;

    let to_cook = app.get("/api/to-be-cooked").await;
    assert_eq!(to_cook.as_array().unwrap().len(), 2);

    let to_buy = app.get("/api/to-be-bought").await;
    assert_eq!(
        to_buy[0],
        json!({
            "name": "500g + 200g Mehl",
            "baseName": "Mehl",
            "amounts": ["500g", "200g"],
            "rezeptIds": [1, 2],
            "rezeptNames": ["Brot", "Kuchen"]
        })
    );
    let names: Vec<&str> = to_buy
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["500g + 200g Mehl", "1 Würfel Hefe", "Salz", "3 Eier", "½ TL Zimt"]);
}

#[tokio::test]
async fn test_removing_recipe_reports_already_bought_ingredients() {
    let app = TestApp::new(&[(RECIPES_KEY, CATALOG)]);
    cook_recipe(&app, 0).await;
    cook_recipe(&app, 1).await;

    // "3 Eier" (index 3) was bought already
    let (status, _) = app.send(Method::DELETE, "/api/to-be-bought/3", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::DELETE, "/api/to-be-cooked/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["alreadyBoughtIngredients"],
        json!([{ "name": "3 Eier", "baseName": "Eier", "rezeptId": 2, "rezeptName": "Kuchen" }])
    );

    let to_buy = app.get("/api/to-be-bought").await;
    let names: Vec<&str> = to_buy
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["500g Mehl", "1 Würfel Hefe", "Salz"]);

    let to_cook = app.get("/api/to-be-cooked").await;
    assert_eq!(to_cook.as_array().unwrap().len(), 1);
    assert_eq!(to_cook[0]["name"], "Brot");
}

#[tokio::test]
async fn test_removing_unknown_recipe_succeeds_with_empty_report() {
    let app = TestApp::new(&[]);

    let (status, body) = app.send(Method::DELETE, "/api/to-be-cooked/99", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "alreadyBoughtIngredients": [] }));
}

#[tokio::test]
async fn test_manual_item_merges_with_recipe_item() {
    let app = TestApp::new(&[(RECIPES_KEY, CATALOG)]);

    let (status, _) = app
        .send(Method::POST, "/api/to-be-bought", Some(json!({ "name": "Salz" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    cook_recipe(&app, 0).await;

    let to_buy = app.get("/api/to-be-bought").await;
    let salz = &to_buy[0];
    assert_eq!(salz["name"], "Salz");
    assert_eq!(salz["rezeptIds"], json!([1]));
    assert_eq!(salz["rezeptNames"], json!(["Brot"]));
}

#[tokio::test]
async fn test_rename_item_reparses_base_name() {
    let app = TestApp::new(&[]);
    app.send(Method::POST, "/api/to-be-bought", Some(json!({ "name": "Milch" })))
        .await;

    let (status, body) = app
        .send(Method::PUT, "/api/to-be-bought/0", Some(json!({ "newName": "2l Hafermilch" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let to_buy = app.get("/api/to-be-bought").await;
    assert_eq!(to_buy[0]["name"], "2l Hafermilch");
    assert_eq!(to_buy[0]["baseName"], "Hafermilch");

    // Out of range is a no-op
    let (status, _) = app
        .send(Method::PUT, "/api/to-be-bought/7", Some(json!({ "newName": "Kakao" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get("/api/to-be-bought").await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_out_of_range_is_noop() {
    let app = TestApp::new(&[]);
    app.send(Method::POST, "/api/to-be-bought", Some(json!({ "name": "Kaffee" })))
        .await;

    let (status, _) = app.send(Method::DELETE, "/api/to-be-bought/5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get("/api/to-be-bought").await[0]["name"], "Kaffee");
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = TestApp::new(&[]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/to-be-bought")
        .body(Body::from("{name:"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let (status, _) = app
        .send(Method::POST, "/api/to-be-cooked", Some(json!({ "name": "Ohne Id" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(Method::DELETE, "/api/to-be-cooked/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written
    assert!(app.store.read(TO_BE_BOUGHT_KEY).await.is_err());
}

#[tokio::test]
async fn test_unknown_route_and_method_are_not_found() {
    let app = TestApp::new(&[]);

    let (status, body) = app.send(Method::GET, "/api/unbekannt", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));

    let (status, body) = app.send(Method::PATCH, "/api/to-be-bought", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new(&[]);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/to-be-bought")
        .header(header::ORIGIN, "http://localhost:8080")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_bare_options_is_no_content() {
    let app = TestApp::new(&[]);

    for uri in ["/api/to-be-bought", "/api/unbekannt"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT, "OPTIONS {uri}");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }
}

#[tokio::test]
async fn test_stored_recipe_without_id_stays_readable() {
    let app = TestApp::new(&[(
        TO_BE_COOKED_KEY,
        r#"[{ "name": "Reste", "zutaten": ["Reis"] }, { "id": 2, "name": "Kuchen", "zutaten": [] }]"#,
    )]);

    let to_cook = app.get("/api/to-be-cooked").await;

    assert_eq!(to_cook[0]["id"], 0);
    assert_eq!(to_cook[0]["name"], "Reste");
    assert_eq!(to_cook[1]["id"], 2);
}

#[tokio::test]
async fn test_static_index_and_images() {
    let app = TestApp::new(&[]);
    let root = app.static_dir.path();
    std::fs::write(root.join("index.html"), "<h1>Kochliste</h1>").unwrap();
    std::fs::create_dir(root.join("images")).unwrap();
    std::fs::write(root.join("images").join("brot.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let response = app
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

    let response = app
        .router()
        .oneshot(Request::builder().uri("/images/brot.png").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);

    let (status, body) = app.send(Method::GET, "/images/fehlt.jpg", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Image not found" }));
}
