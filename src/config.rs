use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/demoDB";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

/// Configuração do serviço, lida do ambiente (e do `.env`, via dotenv)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub host: String,
    pub port: u16,
    /// Teto aplicado ao `limit` da listagem
    pub max_page_size: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a config a partir de uma função de lookup (facilita testes)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!("⚠️  Invalid PORT '{}', using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let max_page_size = match lookup("MAX_PAGE_SIZE") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    log::warn!(
                        "⚠️  Invalid MAX_PAGE_SIZE '{}', using {}",
                        raw,
                        defaults.max_page_size
                    );
                    defaults.max_page_size
                }
            },
            None => defaults.max_page_size,
        };

        Self {
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            max_page_size,
        }
    }
}
