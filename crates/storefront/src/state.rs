//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::bridge::CardBridge;
use crate::cart::{CartHandle, CartSession, CartStore};
use crate::catalog::{Catalog, CatalogError, GridRenderer, ProductApiClient};
use crate::config::CatalogConfig;
use crate::models::SessionUser;
use crate::services::auth::AuthService;
use crate::storage::LocalStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns everything the
/// running storefront needs: configuration, local storage, the cart, the
/// signed-in user and the catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    storage: Arc<dyn LocalStorage>,
    cart: CartHandle,
    user: Mutex<Option<SessionUser>>,
    catalog: RwLock<Catalog>,
    products_api: Option<ProductApiClient>,
    grid: GridRenderer,
}

impl AppState {
    /// Build the state in startup order: load the cart, load the signed-in
    /// user, fetch the catalog (when a product API is configured), then run
    /// the initial render.
    ///
    /// An unreachable product API is logged and leaves the catalog empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the product API URL is invalid.
    pub async fn initialize(
        config: CatalogConfig,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, CatalogError> {
        let session = CartSession::load(CartStore::new(storage.clone()));

        let user = AuthService::new(storage.as_ref(), &config.admin_domain).current_user();
        if let Some(user) = &user {
            tracing::info!(name = %user.name, role = %user.role, "Restored signed-in user");
        }

        let products_api = config
            .api_base
            .as_deref()
            .map(ProductApiClient::new)
            .transpose()?;

        let catalog = match &products_api {
            Some(api) => match api.list().await {
                Ok(products) => {
                    tracing::info!(count = products.len(), "Catalog loaded from product API");
                    Catalog::new(products)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch catalog, starting empty");
                    Catalog::default()
                }
            },
            None => Catalog::default(),
        };

        let bridge = Arc::new(CardBridge::new(config.base_url.clone()));
        let grid = GridRenderer::new().with_listener(bridge.clone());
        let cart = CartHandle::new(session, bridge);

        let state = Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                cart,
                user: Mutex::new(user),
                catalog: RwLock::new(catalog),
                products_api,
                grid,
            }),
        };

        state.cart().with_session(CartSession::render);
        if let Err(e) = state.render_grid("all") {
            tracing::warn!(error = %e, "Initial product grid render failed");
        }

        Ok(state)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to local storage.
    #[must_use]
    pub fn storage(&self) -> &dyn LocalStorage {
        self.inner.storage.as_ref()
    }

    #[must_use]
    pub fn cart(&self) -> &CartHandle {
        &self.inner.cart
    }

    /// Get the remote product API client, if one is configured.
    #[must_use]
    pub fn products_api(&self) -> Option<&ProductApiClient> {
        self.inner.products_api.as_ref()
    }

    /// Sign-in service bound to this state's storage and admin domain.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.storage(), &self.inner.config.admin_domain)
    }

    /// The signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner
            .user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_current_user(&self, user: Option<SessionUser>) {
        *self.inner.user.lock().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Whether the signed-in user should see catalog management controls.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Render the product grid for the current user and publish it to the
    /// grid listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_grid(&self, category_filter: &str) -> Result<String, askama::Error> {
        let is_admin = self.is_admin();
        let catalog = self.catalog();
        self.inner.grid.render(&catalog, category_filter, is_admin)
    }
}
