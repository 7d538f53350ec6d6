use super::{MongoDB, StoreError, UserStore};
use crate::models::{PageRequest, UpdateUserRequest, User, UserFilter};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

pub const USERS_COLLECTION: &str = "users";

/// `__v` nunca sai do banco
fn projection() -> Document {
    doc! { "__v": 0 }
}

/// Escapa metacaracteres para que `q` seja casado como texto literal
pub(crate) fn escape_regex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn filter_document(filter: &UserFilter) -> Document {
    let mut document = Document::new();

    if let Some(min_age) = filter.min_age {
        document.insert("age", doc! { "$gte": min_age });
    }
    if let Some(role) = &filter.role {
        document.insert("roles", role.as_str());
    }
    if let Some(q) = &filter.name_contains {
        document.insert("name", doc! { "$regex": escape_regex(q), "$options": "i" });
    }

    document
}

pub(crate) fn sort_document(page: &PageRequest) -> Document {
    let mut document = Document::new();
    for key in &page.sort {
        document.insert(key.field.as_str(), if key.descending { -1 } else { 1 });
    }
    document
}

impl MongoDB {
    fn users(&self) -> mongodb::Collection<User> {
        self.collection::<User>(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_users(&self, filter: &UserFilter, page: &PageRequest) -> Result<Vec<User>, StoreError> {
        let filter = filter_document(filter);
        log::debug!("🔎 users filter: {}", filter);

        let cursor = self
            .users()
            .find(filter)
            .projection(projection())
            .sort(sort_document(page))
            .skip(page.skip)
            .limit(page.limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self
            .users()
            .find_one(doc! { "_id": id })
            .projection(projection())
            .await?)
    }

    async fn update_user(&self, id: ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, StoreError> {
        let set = mongodb::bson::to_document(changes)?;

        Ok(self
            .users()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .projection(projection())
            .await?)
    }

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
