//! Remote product API client.
//!
//! ```text
//! GET    {base}/api/productos        -> {"ok": true, "items": [...]}
//! POST   {base}/api/productos        -> {"ok": true, "id": 7}
//! PUT    {base}/api/productos/{id}   -> {"ok": true}
//! DELETE {base}/api/productos/{id}   -> {"ok": true}
//! ```
//!
//! Every response carries `ok`; when it is `false` the optional `msg` explains
//! why. The API is the only place where product changes could be authorized.

use std::sync::Arc;

use mi_catalogo_core::ProductId;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use super::{Product, ProductInput};

/// Errors talking to the product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered `ok: false`.
    #[error("{0}")]
    Rejected(String),

    /// Invalid base URL.
    #[error("Invalid product API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct ListBody {
    #[serde(default)]
    items: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    #[serde(default)]
    id: Option<ProductId>,
}

#[derive(Debug, Deserialize)]
struct EmptyBody {}

/// Client for the remote product API.
#[derive(Clone)]
pub struct ProductApiClient {
    inner: Arc<ProductApiClientInner>,
}

struct ProductApiClientInner {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl ProductApiClient {
    /// Create a client for the API rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a valid URL.
    pub fn new(base: &str) -> Result<Self, CatalogError> {
        let base = base.trim_end_matches('/');
        let endpoint = url::Url::parse(&format!("{base}/api/productos"))?;

        Ok(Self {
            inner: Arc::new(ProductApiClientInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        })
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/{id}", self.inner.endpoint)
    }

    /// List every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.client.get(self.inner.endpoint.clone()).send().await?;
        let body: ListBody = read_envelope(response, "Error listando").await?;
        tracing::debug!(count = body.items.len(), "Products fetched");
        Ok(body.items)
    }

    /// Create a product and return it with the id the API assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or no id
    /// comes back.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&input)
            .send()
            .await?;
        let body: CreateBody = read_envelope(response, "Error guardando").await?;
        let id = body
            .id
            .ok_or_else(|| CatalogError::Rejected("Error guardando".to_string()))?;
        Ok(input.into_product(id))
    }

    /// Replace the editable fields of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> Result<(), CatalogError> {
        let response = self
            .inner
            .client
            .put(self.product_url(id))
            .json(input)
            .send()
            .await?;
        read_envelope::<EmptyBody>(response, "Error actualizando").await?;
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let response = self.inner.client.delete(self.product_url(id)).send().await?;
        read_envelope::<EmptyBody>(response, "Error eliminando").await?;
        Ok(())
    }
}

/// Check the status and the `ok` flag, then return the rest of the body.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback_msg: &str,
) -> Result<T, CatalogError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %text.chars().take(500).collect::<String>(),
            "Product API returned non-success status"
        );
        // Error responses may still carry a usable `msg`.
        if let Ok(envelope) = serde_json::from_str::<Envelope<EmptyBody>>(&text)
            && let Some(msg) = envelope.msg
        {
            return Err(CatalogError::Rejected(msg));
        }
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: text.chars().take(200).collect(),
        });
    }

    parse_envelope(&text, fallback_msg)
}

fn parse_envelope<T: DeserializeOwned>(text: &str, fallback_msg: &str) -> Result<T, CatalogError> {
    let envelope: Envelope<T> = serde_json::from_str(text)?;
    if !envelope.ok {
        return Err(CatalogError::Rejected(
            envelope.msg.unwrap_or_else(|| fallback_msg.to_string()),
        ));
    }
    Ok(envelope.body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::{get, put},
    };
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use super::*;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn list(State(_): State<Received>) -> Json<Value> {
        Json(json!({
            "ok": true,
            "items": [
                {"id": 2, "nombre": "Taza", "precio": 120.0, "imagen": "t.png", "descripcion": "", "categoria": "cocina"},
                {"id": 1, "nombre": "Playera", "precio": 99.5, "imagen": "p.png", "descripcion": "algodón", "categoria": "ropa"}
            ]
        }))
    }

    async fn create(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
        received.lock().unwrap().push(body);
        Json(json!({"ok": true, "id": 42}))
    }

    async fn update(Path(id): Path<i64>, Json(_): Json<Value>) -> (StatusCode, Json<Value>) {
        if id == 404 {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"ok": false, "msg": "No encontrado"})),
            )
        } else {
            (StatusCode::OK, Json(json!({"ok": true})))
        }
    }

    async fn delete(Path(_): Path<i64>) -> Json<Value> {
        Json(json!({"ok": false}))
    }

    async fn spawn_api() -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/api/productos", get(list).post(create))
            .route("/api/productos/{id}", put(update).delete(delete))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), received)
    }

    fn input() -> ProductInput {
        ProductInput {
            name: "Lámpara".to_string(),
            price: Decimal::new(2500, 2),
            image_url: "l.png".to_string(),
            description: String::new(),
            category: "hogar".to_string(),
        }
    }

    #[test]
    fn test_parse_envelope_rejects_not_ok() {
        let err = parse_envelope::<ListBody>(r#"{"ok":false,"msg":"boom"}"#, "fallback").unwrap_err();
        assert_eq!(err.to_string(), "boom");

        let err = parse_envelope::<ListBody>(r#"{"ok":false}"#, "fallback").unwrap_err();
        assert_eq!(err.to_string(), "fallback");
    }

    #[test]
    fn test_parse_envelope_missing_items_is_empty() {
        let body = parse_envelope::<ListBody>(r#"{"ok":true}"#, "x").unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(ProductApiClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_list_products() {
        let (base, _) = spawn_api().await;
        let client = ProductApiClient::new(&base).unwrap();

        let products = client.list().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Taza");
        assert_eq!(products[1].price, Decimal::new(995, 1));
    }

    #[tokio::test]
    async fn test_create_sends_wire_names() {
        let (base, received) = spawn_api().await;
        let client = ProductApiClient::new(&format!("{base}/")).unwrap();

        let product = client.create(input()).await.unwrap();
        assert_eq!(product.id, ProductId::new(42));
        assert_eq!(product.name, "Lámpara");

        let sent = received.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["nombre"], "Lámpara");
        assert_eq!(sent[0]["precio"], 25.0);
        assert_eq!(sent[0]["categoria"], "hogar");
    }

    #[tokio::test]
    async fn test_update_surfaces_api_message() {
        let (base, _) = spawn_api().await;
        let client = ProductApiClient::new(&base).unwrap();

        client.update(ProductId::new(1), &input()).await.unwrap();
        let err = client.update(ProductId::new(404), &input()).await.unwrap_err();
        assert_eq!(err.to_string(), "No encontrado");
    }

    #[tokio::test]
    async fn test_delete_not_ok_uses_fallback_message() {
        let (base, _) = spawn_api().await;
        let client = ProductApiClient::new(&base).unwrap();

        let err = client.delete(ProductId::new(3)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Rejected(ref msg) if msg == "Error eliminando"));
    }
}
