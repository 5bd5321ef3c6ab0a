//! Catalog management, sign-in and the product API through the HTTP surface.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use mi_catalogo_integration_tests::{TestApp, spawn_product_api};
use mi_catalogo_storefront::models::keys;
use mi_catalogo_storefront::storage::{LocalStorage, MemoryStorage};
use serde_json::json;

async fn admin_app() -> TestApp {
    let app = TestApp::new().await;
    let res = app.sign_in("profe@tecmilenio.mx").await;
    assert_eq!(res.location(), Some("/?notice=welcome-admin"));
    app
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = TestApp::new().await;

    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "ok");
    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(res.headers["x-frame-options"], "DENY");
    assert!(
        res.headers["content-security-policy"]
            .to_str()
            .unwrap()
            .contains("script-src 'none'")
    );
}

#[tokio::test]
async fn test_sign_in_validation_messages() {
    let app = TestApp::new().await;

    let res = app.post_form("/auth/login", "email=&password=").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Por favor ingresa correo y contraseña."));

    let res = app.post_form("/auth/login", "email=ana&password=x").await;
    assert!(res.body.contains("Correo inválido."));
    assert!(res.body.contains(r#"value="ana""#));

    assert!(app.storage.get_item(keys::CURRENT_USER).unwrap().is_none());
}

#[tokio::test]
async fn test_user_sign_in_and_out() {
    let app = TestApp::new().await;

    let res = app.sign_in("ana@gmail.com").await;
    assert_eq!(res.location(), Some("/?notice=welcome-user"));

    let page = app.get("/?notice=welcome-user").await;
    assert!(page.body.contains("Bienvenido usuario"));
    assert!(page.body.contains("ana (user)"));
    assert!(page.body.contains(r#"aria-disabled="true""#));
    assert!(app.storage.get_item(keys::CURRENT_USER).unwrap().is_some());

    let res = app.post_form("/auth/logout", "").await;
    assert_eq!(res.location(), Some("/?notice=signed-out"));
    assert!(app.storage.get_item(keys::CURRENT_USER).unwrap().is_none());
    assert!(app.get("/").await.body.contains("Iniciar sesión"));
}

#[tokio::test]
async fn test_non_admin_cannot_manage_products() {
    let app = TestApp::new().await;
    app.sign_in("ana@gmail.com").await;

    let res = app.get("/products/new").await;
    assert_eq!(res.location(), Some("/?notice=admin-only-save"));

    let res = app.post_form("/products", "nombre=Taza&precio=1").await;
    assert_eq!(res.location(), Some("/?notice=admin-only-save"));
    assert!(app.state.catalog().is_empty());

    let res = app.post_form("/products/1/delete", "").await;
    assert_eq!(res.location(), Some("/?notice=admin-only-delete"));

    let page = app.get("/?notice=admin-only-save").await;
    assert!(page.body.contains("Acceso denegado. Debes ser administrador para guardar productos."));
}

#[tokio::test]
async fn test_product_form_validation() {
    let app = admin_app().await;

    let page = app.get("/products/new").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Agregar producto"));

    let res = app.post_form("/products", "nombre=&precio=").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Completa nombre y precio."));

    let res = app.post_form("/products", "nombre=Taza&precio=abc").await;
    assert!(res.body.contains("Precio inválido."));
    assert!(res.body.contains(r#"value="Taza""#));
    assert!(app.state.catalog().is_empty());
}

#[tokio::test]
async fn test_create_edit_delete_locally() {
    let app = admin_app().await;

    app.post_form("/products", "nombre=Taza&precio=9.5&categoria=cocina")
        .await;
    let page = app.get("/").await;
    assert!(page.body.contains("1 producto"));
    assert!(page.body.contains("$9.50"));
    assert!(page.body.contains("/products/1/edit"));

    let form = app.get("/products/1/edit").await;
    assert!(form.body.contains("Editar producto"));
    assert!(form.body.contains(r#"value="Taza""#));
    assert!(form.body.contains(r#"<option value="cocina" selected>"#));

    let res = app
        .post_form("/products/1", "nombre=Taza+grande&precio=12&categoria=cocina")
        .await;
    assert_eq!(res.location(), Some("/?notice=product-saved"));
    let page = app.get("/").await;
    assert!(page.body.contains("Taza grande"));
    assert!(page.body.contains("$12.00"));

    let res = app.post_form("/products/1/delete", "").await;
    assert_eq!(res.location(), Some("/?notice=product-deleted"));
    let page = app.get("/").await;
    assert!(page.body.contains("0 productos"));
    assert!(page.body.contains("No hay productos todavía."));
}

#[tokio::test]
async fn test_edit_unknown_product_is_not_found() {
    let app = admin_app().await;
    assert_eq!(app.get("/products/7/edit").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.post_form("/products/7", "nombre=A&precio=1").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_category_filter_hides_other_cards() {
    let app = admin_app().await;
    app.post_form("/products", "nombre=Taza&precio=1&categoria=cocina")
        .await;
    app.post_form("/products", "nombre=Playera&precio=2&categoria=ropa")
        .await;

    let page = app.get("/?categoria=cocina").await;
    assert!(page.body.contains(r#"data-categoria="ropa" hidden>"#));
    assert!(page.body.contains(r#"data-categoria="cocina">"#));
    assert!(page.body.contains(r#"class="active" aria-current="page">Cocina"#));
    assert!(page.body.contains("1 producto"));
    assert!(!page.body.contains("No hay productos todavía."));
    // Hidden cards can still be referenced by product id.
    app.post_form("/cart/add", "card=1").await;
    let cart: serde_json::Value =
        serde_json::from_str(&app.get("/cart/snapshot").await.body).unwrap();
    assert_eq!(cart[0]["name"], "Taza");

    let page = app.get("/?categoria=hogar").await;
    assert!(page.body.contains("0 productos"));
    assert!(page.body.contains("No hay productos todavía."));

    let page = app.get("/?categoria=juguetes").await;
    assert!(page.body.contains(r#"data-categoria="ropa">"#));
    assert!(page.body.contains(r#"data-categoria="cocina">"#));
}

#[tokio::test]
async fn test_catalog_loads_from_product_api() {
    let (base, _) = spawn_product_api(vec![json!({
        "id": 5, "nombre": "Lámpara", "precio": 250.0, "imagen": "https://img.example.com/l.png",
        "descripcion": "De mesa", "categoria": "hogar"
    })])
    .await;
    let app = TestApp::start(&[("CATALOG_API_BASE", &base)], Arc::new(MemoryStorage::new())).await;

    let page = app.get("/").await;
    assert!(page.body.contains("Lámpara"));
    assert!(page.body.contains("$250.00"));
    assert!(page.body.contains("1 producto"));

    app.post_form("/cart/add", "card=5").await;
    let cart: serde_json::Value =
        serde_json::from_str(&app.get("/cart/snapshot").await.body).unwrap();
    assert_eq!(cart[0]["imageUrl"], "https://img.example.com/l.png");
}

#[tokio::test]
async fn test_product_changes_go_to_the_api_first() {
    let (base, received) = spawn_product_api(Vec::new()).await;
    let app = TestApp::start(&[("CATALOG_API_BASE", &base)], Arc::new(MemoryStorage::new())).await;
    app.sign_in("profe@tecmilenio.mx").await;

    let res = app
        .post_form("/products", "nombre=Silla&precio=300&categoria=hogar")
        .await;
    assert_eq!(res.location(), Some("/?notice=product-saved"));
    assert!(app.get("/").await.body.contains("/products/100/edit"));

    app.post_form("/products/100", "nombre=Silla&precio=280&categoria=hogar")
        .await;
    assert!(app.get("/").await.body.contains("$280.00"));

    // The stub refuses deletes; the product stays.
    let res = app.post_form("/products/100/delete", "").await;
    assert_eq!(res.location(), Some("/?notice=delete-failed"));
    assert_eq!(app.state.catalog().len(), 1);

    let received = received.lock().unwrap().clone();
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].0, "POST");
    assert_eq!(received[0].1["nombre"], "Silla");
    assert_eq!(received[0].1["precio"], 300.0);
    assert_eq!(received[1].0, "PUT 100");
    assert_eq!(received[2].0, "DELETE 100");
}

#[tokio::test]
async fn test_unreachable_product_api_starts_empty() {
    let app = TestApp::start(
        &[("CATALOG_API_BASE", "http://127.0.0.1:9")],
        Arc::new(MemoryStorage::new()),
    )
    .await;
    assert!(app.state.catalog().is_empty());
    assert!(app.get("/").await.body.contains("0 productos"));
}
