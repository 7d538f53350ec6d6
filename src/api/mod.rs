pub mod health;
pub mod swagger;
pub mod users;


use actix_web::web;

use crate::utils::error::AppError;

/// Rotas do serviço. Corpo/query inválidos viram 400 `{error}` como os demais erros.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    // Health check
    .route("/health", web::get().to(health::health_check))
    // Users
    .service(users::create_user)
    .service(users::list_users)
    .service(users::get_user)
    .service(users::update_user)
    .service(users::delete_user);
}
