use std::env;

/// Base URLs of the two remote services, environment-driven
#[derive(Debug, Clone)]
pub struct Config {
    /// Brokerage backend (listings and file storage)
    pub api_base_url: String,
    /// External postal-code service
    pub cep_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("AUROS_API_URL")
                .unwrap_or_else(|_| "http://localhost:3333".to_string()),
            cep_base_url: env::var("BRASIL_API_URL")
                .unwrap_or_else(|_| "https://brasilapi.com.br".to_string()),
        }
    }
}
