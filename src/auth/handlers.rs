use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::session::SessionManager;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::{validation, views, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

pub async fn register_form() -> HttpResponse {
    views::html(views::register_page(None, "", ""))
}

pub async fn register(
    form: web::Form<RegisterForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    info!("Received registration request for username: {}", form.username);

    let rerender = |message: &str| views::html(views::register_page(Some(message), &form.username, &form.full_name));

    if let Err(message) = validation::validate_new_user(&form.username, &form.password, &form.full_name) {
        return Ok(rerender(message));
    }

    match state
        .auth_service
        .register(&form.username, &form.password, &form.full_name, false)
        .await
    {
        Ok(user) => {
            info!("Registration successful for username: {}", user.username);
            Ok(views::redirect("/auth/login"))
        }
        Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
            warn!("Registration rejected, username taken: {}", form.username);
            Ok(rerender(&format!("User {} is already registered.", form.username)))
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form() -> HttpResponse {
    views::html(views::login_page(None, ""))
}

pub async fn login(
    form: web::Form<LoginForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", form.username);

    match state.auth_service.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            // A fresh token replaces whatever session the browser carried.
            let token = state.sessions.issue_token(user.id)?;
            let mut response = views::redirect("/users/");
            response
                .add_cookie(&state.sessions.session_cookie(token))
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            Ok(response)
        }
        Err(AppError::AuthError(e @ (AuthError::UnknownUsername | AuthError::IncorrectPassword))) => {
            Ok(views::html(views::login_page(Some(&e.to_string()), &form.username)))
        }
        Err(e) => Err(e),
    }
}

pub async fn logout() -> Result<HttpResponse, AppError> {
    let mut response = views::redirect("/auth/login");
    response
        .add_cookie(&SessionManager::removal_cookie())
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(response)
}
