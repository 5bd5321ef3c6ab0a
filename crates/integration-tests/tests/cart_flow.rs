//! Cart flows through the HTTP surface: adding from product cards, quantity
//! changes, the drawer, checkout and persistence across restarts.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use mi_catalogo_integration_tests::{TestApp, form_value};
use mi_catalogo_storefront::cart::CART_KEY;
use mi_catalogo_storefront::storage::LocalStorage;
use serde_json::Value;

/// Storefront with an admin signed in and two products in the catalog.
async fn app_with_products() -> TestApp {
    let app = TestApp::new().await;
    app.sign_in("profe@tecmilenio.mx").await;

    let res = app
        .post_form("/products", "nombre=Taza&precio=9.50&categoria=cocina")
        .await;
    assert_eq!(res.location(), Some("/?notice=product-saved"));
    let res = app
        .post_form("/products", "nombre=Playera&precio=120&categoria=ropa")
        .await;
    assert_eq!(res.location(), Some("/?notice=product-saved"));

    app
}

async fn snapshot(app: &TestApp) -> Value {
    let res = app.get("/cart/snapshot").await;
    assert_eq!(res.status, StatusCode::OK);
    serde_json::from_str(&res.body).unwrap()
}

#[tokio::test]
async fn test_catalog_page_has_add_buttons_for_every_card() {
    let app = app_with_products().await;

    let page = app.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("2 productos"));
    // Newest first.
    assert!(page.body.find("Playera").unwrap() < page.body.find("Taza").unwrap());
    // Add controls post the product id.
    assert!(page.body.contains(r#"name="card" value="2""#));
    assert!(page.body.contains(r#"name="card" value="1""#));
    assert_eq!(page.body.matches("➕ Agregar").count(), 2);
}

#[tokio::test]
async fn test_add_same_card_increments_quantity() {
    let app = app_with_products().await;
    app.get("/").await;

    // Taza was created first, so its id is 1.
    for _ in 0..3 {
        let res = app.post_form("/cart/add", "card=1").await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        assert_eq!(res.location(), Some("/"));
    }

    let cart = snapshot(&app).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["name"], "Taza");
    assert_eq!(cart[0]["quantity"], 3);

    assert_eq!(app.get("/cart/count").await.body, "3");

    let page = app.get("/").await;
    assert!(page.body.contains("3 × $9.50"));
    assert!(page.body.contains("$28.50"));
    assert!(page.body.contains("🛒 3"));
}

#[tokio::test]
async fn test_every_change_is_written_through() {
    let app = app_with_products().await;
    app.get("/").await;

    app.post_form("/cart/add", "card=2").await;
    let stored: Value =
        serde_json::from_str(&app.storage.get_item(CART_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored[0]["name"], "Playera");
    assert_eq!(stored[0]["quantity"], 1);

    app.post_form("/cart/clear", "").await;
    assert_eq!(app.storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_quantity_changes_and_removal() {
    let app = app_with_products().await;
    app.get("/").await;
    app.post_form("/cart/add", "card=2").await;
    app.post_form("/cart/add", "card=1").await;

    let cart = snapshot(&app).await;
    let playera = form_value(cart[0]["id"].as_str().unwrap());
    let taza = form_value(cart[1]["id"].as_str().unwrap());

    app.post_form("/cart/increment", &format!("id={taza}")).await;
    assert_eq!(snapshot(&app).await[1]["quantity"], 2);

    // Decrementing to zero removes the line.
    app.post_form("/cart/decrement", &format!("id={playera}")).await;
    let cart = snapshot(&app).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["name"], "Taza");

    app.post_form("/cart/remove", &format!("id={taza}")).await;
    assert!(snapshot(&app).await.as_array().unwrap().is_empty());
    assert!(app.get("/").await.body.contains("El carrito está vacío."));
}

#[tokio::test]
async fn test_unknown_card_is_not_found() {
    let app = app_with_products().await;
    app.get("/").await;

    let res = app.post_form("/cart/add", "card=9").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "Producto no encontrado");
    assert_eq!(app.get("/cart/count").await.body, "0");
}

#[tokio::test]
async fn test_stale_page_adds_the_clicked_product() {
    let app = app_with_products().await;
    let old_page = app.get("/").await;
    assert!(old_page.body.contains(r#"name="card" value="1""#));

    // Another product lands in front of Taza before the old page is used.
    app.post_form("/products", "nombre=Lapiz&precio=3&categoria=hogar")
        .await;
    app.get("/").await;

    app.post_form("/cart/add", "card=1").await;
    let cart = snapshot(&app).await;
    assert_eq!(cart[0]["name"], "Taza");

    // Once Taza is deleted the old button adds nothing.
    app.post_form("/products/1/delete", "").await;
    let res = app.post_form("/cart/add", "card=1").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(snapshot(&app).await[0]["quantity"], 1);
}

#[tokio::test]
async fn test_drawer_toggle() {
    let app = TestApp::new().await;

    assert!(app.get("/").await.body.contains(r#"id="mcCartDrawer" hidden"#));

    app.post_form("/cart/toggle", "").await;
    let page = app.get("/").await;
    assert!(page.body.contains(r#"id="mcCartDrawer">"#));
    assert!(page.body.contains(r#"aria-pressed="true""#));

    app.post_form("/cart/toggle", "").await;
    assert!(app.get("/").await.body.contains(r#"id="mcCartDrawer" hidden"#));
}

#[tokio::test]
async fn test_checkout_empty_cart_blocks() {
    let app = TestApp::new().await;

    let res = app.post_form("/cart/checkout", "").await;
    assert_eq!(res.location(), Some("/?notice=empty-cart"));

    let page = app.get(res.location().unwrap()).await;
    assert!(page.body.contains(r#"role="alert">El carrito está vacío."#));
}

#[tokio::test]
async fn test_checkout_shows_total_and_keeps_cart() {
    let app = app_with_products().await;
    app.get("/").await;
    app.post_form("/cart/add", "card=1").await;
    app.post_form("/cart/add", "card=1").await;

    let res = app.post_form("/cart/checkout", "").await;
    let location = res.location().unwrap().to_string();
    assert_eq!(location, "/?notice=checkout&total=%2419.00");

    let page = app.get(&location).await;
    assert!(page.body.contains(
        "Ejemplo demo: total $19.00. Implementa tu flujo de pago en el backend."
    ));
    assert_eq!(app.get("/cart/count").await.body, "2");
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let app = app_with_products().await;
    app.get("/").await;
    app.post_form("/cart/add", "card=1").await;
    app.post_form("/cart/add", "card=2").await;

    let restarted = TestApp::with_storage(app.storage.clone()).await;
    let cart = snapshot(&restarted).await;
    assert_eq!(cart.as_array().unwrap().len(), 2);
    assert_eq!(cart[0]["name"], "Taza");
    assert_eq!(cart[1]["name"], "Playera");
    assert!(restarted.state.is_admin());
}

#[tokio::test]
async fn test_corrupt_stored_cart_starts_empty() {
    let storage = std::sync::Arc::new(
        mi_catalogo_storefront::storage::MemoryStorage::new().with_item(CART_KEY, "{not json"),
    );
    let app = TestApp::with_storage(storage).await;

    assert!(snapshot(&app).await.as_array().unwrap().is_empty());
    assert_eq!(app.storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
}
