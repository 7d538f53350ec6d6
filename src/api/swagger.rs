use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD API for users stored in MongoDB.\n\n**Features:**\n- Create, read, partial update and delete users\n- Listing with filters (minAge, role, q), sorting and pagination\n- Health monitoring"
    ),
    paths(
        // Users
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::UserResponse,
            crate::models::Address,
            crate::models::CreateUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::DeleteUserResponse,
            crate::utils::error::ErrorResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User resource: create, list, fetch, patch and delete."),
        (name = "Health", description = "Health check including a database ping."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/users"));
        assert!(paths.contains_key("/users/{id}"));
        assert!(paths.contains_key("/health"));
    }
}
