//! Integration test helpers for Mi Catálogo.
//!
//! Tests drive the full storefront router in process with
//! `tower::ServiceExt::oneshot`, backed by in-memory local storage. The
//! product API, when a test needs one, is a small axum stub on a random
//! local port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mi-catalogo-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, header},
    routing::{get, put},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use mi_catalogo_storefront::config::CatalogConfig;
use mi_catalogo_storefront::routes;
use mi_catalogo_storefront::state::AppState;
use mi_catalogo_storefront::storage::MemoryStorage;

/// A running storefront and the storage behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// Storefront with empty storage and no product API.
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new())).await
    }

    /// Storefront over existing storage, as after a restart.
    pub async fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        Self::start(&[], storage).await
    }

    /// Storefront with configuration overrides.
    pub async fn start(vars: &[(&str, &str)], storage: Arc<MemoryStorage>) -> Self {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = CatalogConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("Invalid test configuration");

        let state = AppState::initialize(config, storage.clone())
            .await
            .expect("Failed to initialize storefront");

        Self {
            router: routes::app(state.clone()),
            state,
            storage,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// POST a url-encoded form body such as `"card=1"`.
    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sign in with any password.
    pub async fn sign_in(&self, email: &str) -> TestResponse {
        self.post_form("/auth/login", &format!("email={email}&password=secreto"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Percent-encode a form value.
#[must_use]
pub fn form_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Requests received by the product API stub.
pub type Received = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone)]
struct ApiStub {
    products: Arc<Mutex<Vec<Value>>>,
    received: Received,
}

async fn stub_list(State(stub): State<ApiStub>) -> Json<Value> {
    let items = stub.products.lock().expect("stub lock").clone();
    Json(json!({ "ok": true, "items": items }))
}

async fn stub_create(State(stub): State<ApiStub>, Json(body): Json<Value>) -> Json<Value> {
    stub.received
        .lock()
        .expect("stub lock")
        .push(("POST".to_string(), body));
    Json(json!({ "ok": true, "id": 100 }))
}

async fn stub_update(
    State(stub): State<ApiStub>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.received
        .lock()
        .expect("stub lock")
        .push((format!("PUT {id}"), body));
    Json(json!({ "ok": true }))
}

/// The stub refuses every delete.
async fn stub_delete(State(stub): State<ApiStub>, Path(id): Path<i64>) -> Json<Value> {
    stub.received
        .lock()
        .expect("stub lock")
        .push((format!("DELETE {id}"), Value::Null));
    Json(json!({ "ok": false, "msg": "Producto protegido" }))
}

/// Start a product API stub serving `products`. Returns its base URL and
/// the log of mutating requests.
pub async fn spawn_product_api(products: Vec<Value>) -> (String, Received) {
    let stub = ApiStub {
        products: Arc::new(Mutex::new(products)),
        received: Received::default(),
    };
    let received = stub.received.clone();

    let app = Router::new()
        .route("/api/productos", get(stub_list).post(stub_create))
        .route("/api/productos/{id}", put(stub_update).delete(stub_delete))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().expect("Stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server error");
    });

    (format!("http://{addr}"), received)
}
