//! User and group management.

pub mod forms;
pub mod handlers;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(handlers::get_user_list))
            .route("/", web::get().to(handlers::get_user_list))
            .route("/create", web::get().to(handlers::create_user_form))
            .route("/create", web::post().to(handlers::create_user_item))
            .route("/{id}", web::get().to(handlers::get_user_item))
            .route("/{id}/edit", web::get().to(handlers::edit_user_form))
            .route("/{id}/edit", web::post().to(handlers::edit_user_item))
            .route("/{id}/delete", web::post().to(handlers::delete_user_item)),
    );
}
