//! Authentication module
//!
//! Password hashing, signed session cookies, the request guards and the
//! register/login/logout handlers.

pub mod guards;
pub mod handlers;
pub mod password;
mod service;
pub mod session;

pub use guards::{AdminRequired, CurrentUser, LoginRequired};
pub use service::AuthService;
pub use session::{SessionManager, SESSION_COOKIE};

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::get().to(handlers::register_form))
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::get().to(handlers::login_form))
            .route("/login", web::post().to(handlers::login))
            .route("/logout", web::get().to(handlers::logout)),
    );
}
