// ==================== USER SERVICE ====================
// Normaliza -> valida -> uma chamada ao store por operação.
// Cada operação decide em qual classe de AppError o erro do driver vira.

use crate::{
    database::UserStore,
    models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, User},
    utils::error::AppError,
};
use mongodb::bson::{oid::ObjectId, DateTime};

/// Id malformado vira 400 com a mensagem de cast
pub fn parse_user_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| {
        AppError::InvalidRequest(format!(
            "Cast to ObjectId failed for value \"{}\" (type string) at path \"_id\" for model \"User\"",
            id
        ))
    })
}

pub async fn create_user(store: &dyn UserStore, request: CreateUserRequest) -> Result<User, AppError> {
    let user = request
        .into_user(DateTime::now())
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    store
        .insert_user(&user)
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    log::info!("✅ User created: {} <{}>", user.id, user.email);
    Ok(user)
}

pub async fn list_users(
    store: &dyn UserStore,
    query: &ListUsersQuery,
    max_page_size: i64,
) -> Result<Vec<User>, AppError> {
    let (filter, page) = query
        .into_request(max_page_size)
        .map_err(AppError::InvalidRequest)?;

    log::debug!("📋 Listing users: {:?} {:?}", filter, page);

    store
        .find_users(&filter, &page)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

pub async fn get_user(store: &dyn UserStore, id: &str) -> Result<User, AppError> {
    let object_id = parse_user_id(id)?;

    store
        .find_user(object_id)
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
        .ok_or_else(AppError::not_found)
}

pub async fn update_user(
    store: &dyn UserStore,
    id: &str,
    changes: UpdateUserRequest,
) -> Result<User, AppError> {
    let object_id = parse_user_id(id)?;

    let changes = changes.normalized();
    changes
        .validate()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    // Sem campos para alterar: devolve o documento atual
    let updated = if changes.is_empty() {
        store.find_user(object_id).await
    } else {
        store.update_user(object_id, &changes).await
    };

    let user = updated
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
        .ok_or_else(AppError::not_found)?;

    log::info!("✏️  User updated: {}", user.id);
    Ok(user)
}

pub async fn delete_user(store: &dyn UserStore, id: &str) -> Result<User, AppError> {
    let object_id = parse_user_id(id)?;

    let user = store
        .delete_user(object_id)
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
        .ok_or_else(AppError::not_found)?;

    log::info!("🗑️  User deleted: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id("652f1c2e9b1e8a3d4c5b6a79").is_ok());
        match parse_user_id("abc") {
            Err(AppError::InvalidRequest(msg)) => {
                assert!(msg.starts_with("Cast to ObjectId failed for value \"abc\""))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_duplicate_email_keeps_single_record() {
        let store = MemoryStore::new();
        create_user(&store, request("Alice", "a@x.com")).await.unwrap();

        let err = create_user(&store, request("Other", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref msg) if msg.contains("E11000")));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_invalid_update_does_not_touch_record() {
        let store = MemoryStore::new();
        let user = create_user(&store, request("Alice", "a@x.com")).await.unwrap();

        let changes = UpdateUserRequest {
            age: Some(-3),
            ..Default::default()
        };
        let err = update_user(&store, &user.id.to_hex(), changes).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let stored = get_user(&store, &user.id.to_hex()).await.unwrap();
        assert_eq!(stored.age, None);
    }

    #[actix_web::test]
    async fn test_empty_update_returns_current_record() {
        let store = MemoryStore::new();
        let user = create_user(&store, request("Alice", "a@x.com")).await.unwrap();

        let same = update_user(&store, &user.id.to_hex(), UpdateUserRequest::default())
            .await
            .unwrap();
        assert_eq!(same, user);
    }

    #[actix_web::test]
    async fn test_list_failure_is_server_error() {
        let store = MemoryStore::failing("connection refused");
        let err = list_users(&store, &ListUsersQuery::default(), 100).await.unwrap_err();
        assert_eq!(err, AppError::DatabaseError("connection refused".into()));

        let err = get_user(&store, "652f1c2e9b1e8a3d4c5b6a79").await.unwrap_err();
        assert_eq!(err, AppError::InvalidRequest("connection refused".into()));
    }
}
