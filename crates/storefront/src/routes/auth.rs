//! Sign-in route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::{Notice, NoticeView, PageChrome};
use crate::cart::CartView;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::models::SessionUser;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<SessionUser>,
    pub cart: CartView,
    pub notice: Option<NoticeView>,
    pub error: Option<String>,
    /// Previously entered email, kept after a failed attempt.
    pub email: String,
}

impl LoginTemplate {
    fn new(state: &AppState, email: String, error: Option<String>) -> Self {
        let PageChrome { user, cart } = PageChrome::load(state);
        Self {
            user,
            cart,
            notice: None,
            error,
            email,
        }
    }
}

fn login_error_message(error: &AuthError) -> String {
    match error {
        AuthError::MissingCredentials => error.to_string(),
        AuthError::InvalidEmail(_) => "Correo inválido.".to_string(),
    }
}

/// Display the login page.
#[instrument(skip(state))]
pub async fn login_page(State(state): State<AppState>) -> LoginTemplate {
    LoginTemplate::new(&state, String::new(), None)
}

/// Handle login form submission.
#[instrument(skip(state))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let password = SecretString::from(form.password);

    match state.auth().login(&form.email, &password) {
        Ok(user) => {
            set_sentry_user(&user.name, Some(user.email.as_str()));
            add_breadcrumb("auth", "Signed in", Some(&[("role", user.role.as_str())]));
            let notice = if user.is_admin() {
                Notice::WelcomeAdmin
            } else {
                Notice::WelcomeUser
            };
            state.set_current_user(Some(user));
            notice.redirect().into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Sign-in rejected");
            LoginTemplate::new(&state, form.email, Some(login_error_message(&e))).into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Response {
    state.auth().logout();
    state.set_current_user(None);
    clear_sentry_user();
    Notice::SignedOut.redirect().into_response()
}
