use std::env;

use anyhow::Context;

use crate::auth::hash_api_key;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// SHA-256 hex digest of the librarian API key; librarian routes are open when unset
    pub librarian_key_hash: Option<String>,
    /// Base URL of the payment gateway
    pub payment_gateway_url: String,
    /// Shared secret for signing gateway requests (HMAC-SHA256)
    pub payment_gateway_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(p) => p.parse().context("PORT must be a valid port number")?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port,
            librarian_key_hash: env::var("LIBRARIAN_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .map(|k| hash_api_key(&k)),
            payment_gateway_url: env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9090".to_string()),
            payment_gateway_secret: env::var("PAYMENT_GATEWAY_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }

    /// Check if librarian routes require an API key
    pub fn librarian_auth_enabled(&self) -> bool {
        self.librarian_key_hash.is_some()
    }
}
