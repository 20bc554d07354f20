//! Request guards.
//!
//! [`CurrentUser`] resolves the session cookie to a user row for the duration
//! of a request. [`LoginRequired`] and [`AdminRequired`] build on it and fail
//! extraction, short-circuiting the handler, when the caller lacks access.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::auth::session::SESSION_COOKIE;
use crate::db::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// The logged-in user, or `None` for anonymous callers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

async fn load_logged_in_user(
    state: Option<web::Data<AppState>>,
    token: Option<String>,
) -> Result<Option<User>, AppError> {
    let state = state
        .ok_or_else(|| AppError::InternalError("application state is not configured".into()))?;

    let Some(token) = token else {
        return Ok(None);
    };

    let user_id = match state.sessions.decode_token(&token) {
        Ok(user_id) => user_id,
        Err(e) => {
            debug!("Ignoring session cookie: {}", e);
            return Ok(None);
        }
    };

    state.db.get_user_by_id(user_id).await
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move { load_logged_in_user(state, token).await.map(CurrentUser) })
    }
}

/// Any logged-in user; anonymous callers are redirected to the login page.
#[derive(Debug, Clone)]
pub struct LoginRequired(pub User);

impl FromRequest for LoginRequired {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            match current.await? {
                CurrentUser(Some(user)) => Ok(LoginRequired(user)),
                CurrentUser(None) => Err(AppError::AuthError(AuthError::LoginRequired)),
            }
        })
    }
}

/// A logged-in user with the admin flag; others get 403.
#[derive(Debug, Clone)]
pub struct AdminRequired(pub User);

impl FromRequest for AdminRequired {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let login = LoginRequired::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let LoginRequired(user) = login.await?;
            if user.is_admin {
                Ok(AdminRequired(user))
            } else {
                warn!("User {} denied access to {}", user.username, path);
                Err(AppError::AuthError(AuthError::Forbidden))
            }
        })
    }
}
