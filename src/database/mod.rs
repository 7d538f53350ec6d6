mod users;

#[cfg(test)]
pub mod memory;

use crate::models::{PageRequest, UpdateUserRequest, User, UserFilter};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::fmt;

const DEFAULT_DATABASE: &str = "demoDB";

/// Erro vindo do driver; a mensagem é repassada sem alteração ao cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// Persistência de usuários. Cada método corresponde a uma única chamada ao banco.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_users(&self, filter: &UserFilter, page: &PageRequest) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    /// `$set` dos campos presentes; devolve o documento já atualizado
    async fn update_user(&self, id: ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, StoreError>;

    /// Remove e devolve o documento removido
    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Índices da coleção de usuários: email único e name (ordenação padrão)
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let collection = self.collection::<User>(users::USERS_COLLECTION);

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // Falha aqui significa dados duplicados já existentes: o serviço não sobe
        collection.create_index(email_index).await?;
        log::info!("   ✅ Index ready: users(email) unique");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .build();

        match collection.create_index(name_index).await {
            Ok(_) => log::info!("   ✅ Index ready: users(name)"),
            Err(e) => log::warn!("   ⚠️  Could not create users(name) index: {}", e),
        }

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Encerra o pool do driver; chamado no shutdown do servidor
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::info!("👋 MongoDB connection closed");
    }
}
