use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ROLE: &str = "user";

/// Endereço opcional do usuário
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Usuário (armazenado no MongoDB, coleção `users`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    /// Único (índice `email_1`)
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,

    /// Nunca vazio após create/update
    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    pub created_at: DateTime,

    /// Version key interna do documento, nunca exposta na API
    #[serde(rename = "__v", default)]
    pub version: i32,
}

/// Representação do usuário nas respostas HTTP
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "652f1c2e9b1e8a3d4c5b6a79")]
    pub id: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            age: user.age,
            roles: user.roles,
            address: user.address,
            created_at: chrono::DateTime::from_timestamp_millis(user.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteUserResponse {
    #[schema(example = "Deleted")]
    pub message: String,
    pub id: String,
}

/// Request para criar usuário (POST /users). Campos desconhecidos são ignorados.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    pub age: Option<i64>,
    pub roles: Option<Vec<String>>,
    pub address: Option<Address>,
}

/// Request de atualização parcial (PATCH /users/{id}).
/// Serializa direto para o documento do `$set`, só com os campos presentes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Regra de normalização: lista de roles vazia ou ausente vira `["user"]`
pub fn normalize_roles(roles: Option<Vec<String>>) -> Vec<String> {
    match roles {
        Some(roles) if !roles.is_empty() => roles,
        _ => vec![DEFAULT_ROLE.to_string()],
    }
}

// ==================== VALIDATION ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub path: &'static str,
    pub message: String,
}

/// Falha de validação com uma ou mais mensagens por campo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    context: &'static str,
    failures: Vec<FieldFailure>,
}

impl ValidationError {
    fn new(context: &'static str) -> Self {
        Self {
            context,
            failures: Vec::new(),
        }
    }

    /// Campo obrigatório e não vazio; devolve string vazia quando falha
    fn require(&mut self, path: &'static str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                self.push(path, format!("Path `{}` is required.", path));
                String::new()
            }
        }
    }

    /// Campo opcional que, se enviado, não pode ficar vazio
    fn non_empty(&mut self, path: &'static str, value: Option<&String>) {
        if let Some(value) = value {
            if value.trim().is_empty() {
                self.push(path, format!("Path `{}` is required.", path));
            }
        }
    }

    fn min(&mut self, path: &'static str, value: Option<i64>, min: i64) {
        if let Some(value) = value {
            if value < min {
                self.push(
                    path,
                    format!(
                        "Path `{}` ({}) is less than minimum allowed value ({}).",
                        path, value, min
                    ),
                );
            }
        }
    }

    fn push(&mut self, path: &'static str, message: String) {
        self.failures.push(FieldFailure { path, message });
    }

    fn finish(self) -> Result<(), Self> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.context)?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", failure.path, failure.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl CreateUserRequest {
    /// Normaliza, valida e monta o documento a ser inserido
    pub fn into_user(self, created_at: DateTime) -> Result<User, ValidationError> {
        let roles = normalize_roles(self.roles);

        let mut errors = ValidationError::new("User validation failed");
        let name = errors.require("name", self.name);
        let email = errors.require("email", self.email);
        errors.min("age", self.age, 0);
        errors.finish()?;

        Ok(User {
            id: ObjectId::new(),
            name,
            email,
            age: self.age,
            roles,
            address: self.address,
            created_at,
            version: 0,
        })
    }
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Mesma regra de roles do create, aplicada só quando `roles` foi enviado
    pub fn normalized(mut self) -> Self {
        if self.roles.is_some() {
            self.roles = Some(normalize_roles(self.roles.take()));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new("Validation failed");
        errors.non_empty("name", self.name.as_ref());
        errors.non_empty("email", self.email.as_ref());
        errors.min("age", self.age, 0);
        errors.finish()
    }

}
