pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use crate::error::AppError;
use actix_web::web;

/// Registers every API route plus the JSON, form and query error handlers.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .app_data(query_config())
        .service(health::root)
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::login_for_access_token)
                .service(auth::refresh_access_token),
        )
        .service(
            web::scope("/users")
                .service(users::create_user)
                .service(users::read_users)
                .service(users::read_user)
                .service(users::update_user)
                .service(users::delete_user),
        )
        .service(
            web::scope("/todos")
                .service(todos::create_todo)
                .service(todos::list_todos)
                .service(todos::patch_todo)
                .service(todos::delete_todo),
        );
}

/// Bodies that fail to deserialize are answered like failed field validation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
