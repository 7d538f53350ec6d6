// Store em memória usado pelos testes dos handlers.
// Reproduz a semântica das queries do MongoDB que o serviço usa.

use super::users::USERS_COLLECTION;
use super::{StoreError, UserStore};
use crate::models::{PageRequest, SortField, UpdateUserRequest, User, UserFilter};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toda operação falha com `message` (simula banco fora do ar)
    pub fn failing(message: &str) -> Self {
        Self {
            users: RwLock::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError(message.clone())),
            None => Ok(()),
        }
    }

    fn lock_error() -> StoreError {
        StoreError("memory store lock poisoned".to_string())
    }
}

fn duplicate_email(email: &str) -> StoreError {
    StoreError(format!(
        "E11000 duplicate key error collection: demoDB.{} index: email_1 dup key: {{ email: \"{}\" }}",
        USERS_COLLECTION, email
    ))
}

/// Merge dos campos presentes, como o `$set` do MongoDB
fn apply_changes(user: &mut User, changes: &UpdateUserRequest) {
    if let Some(name) = &changes.name {
        user.name = name.clone();
    }
    if let Some(email) = &changes.email {
        user.email = email.clone();
    }
    if let Some(age) = changes.age {
        user.age = Some(age);
    }
    if let Some(roles) = &changes.roles {
        user.roles = roles.clone();
    }
    if let Some(address) = &changes.address {
        user.address = Some(address.clone());
    }
}

fn matches(user: &User, filter: &UserFilter) -> bool {
    if let Some(min_age) = filter.min_age {
        match user.age {
            Some(age) if age as f64 >= min_age => {}
            _ => return false,
        }
    }
    if let Some(role) = &filter.role {
        if !user.roles.iter().any(|r| r == role) {
            return false;
        }
    }
    if let Some(q) = &filter.name_contains {
        if !user.name.to_lowercase().contains(&q.to_lowercase()) {
            return false;
        }
    }
    true
}

/// Campo ausente ordena antes de qualquer valor, como no MongoDB
fn compare_field(a: &User, b: &User, key: &SortField) -> Ordering {
    let ordering = match key.field.as_str() {
        "name" => a.name.cmp(&b.name),
        "email" => a.email.cmp(&b.email),
        "age" => a.age.cmp(&b.age),
        "createdAt" => a.created_at.cmp(&b.created_at),
        "_id" => a.id.bytes().cmp(&b.id.bytes()),
        _ => Ordering::Equal,
    };
    if key.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_users(&self, filter: &UserFilter, page: &PageRequest) -> Result<Vec<User>, StoreError> {
        self.check()?;
        let users = self.users.read().map_err(|_| Self::lock_error())?;

        let mut found: Vec<User> = users.iter().filter(|u| matches(u, filter)).cloned().collect();
        found.sort_by(|a, b| {
            page.sort
                .iter()
                .map(|key| compare_field(a, b, key))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        Ok(found
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.read().map_err(|_| Self::lock_error())?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, id: ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;

        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(duplicate_email(email));
            }
        }

        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            apply_changes(user, changes);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let position = users.iter().position(|u| u.id == id);
        Ok(position.map(|index| users.remove(index)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
