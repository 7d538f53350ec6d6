use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::config::AppConfig;
use crate::database::UserStore;
use crate::models::{
    CreateUserRequest, DeleteUserResponse, ListUsersQuery, UpdateUserRequest, UserResponse,
};
use crate::services::user_service;
use crate::utils::error::{AppError, ErrorResponse};

/// POST /users - Cria usuário (roles vazio vira ["user"])
#[utoipa::path(
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed or email already in use", body = ErrorResponse)
    )
)]
#[post("/users")]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::create_user(store.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /users - Lista com filtros, ordenação e paginação
#[utoipa::path(
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users (possibly empty)", body = [UserResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[get("/users")]
pub async fn list_users(
    store: web::Data<dyn UserStore>,
    config: web::Data<AppConfig>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let users = user_service::list_users(store.get_ref(), &query, config.max_page_size).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /users/{id}
#[utoipa::path(
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[get("/users/{id}")]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::get_user(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /users/{id} - Atualização parcial (só os campos enviados)
#[utoipa::path(
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation failed or malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[patch("/users/{id}")]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::update_user(store.get_ref(), &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /users/{id}
#[utoipa::path(
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::delete_user(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(DeleteUserResponse {
        message: "Deleted".to_string(),
        id: user.id.to_hex(),
    }))
}
