//! Configuración de variables de entorno
//!
//! Todas las variables tienen valor por defecto salvo `JWT_SECRET` en
//! producción.

use std::env;

use anyhow::{bail, Context, Result};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub seed_default_drivers: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            seed_default_drivers: true,
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración del entorno
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid number")?,
            Err(_) => defaults.port,
        };

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw.parse().context("JWT_EXPIRATION must be a valid number")?,
            Err(_) => defaults.jwt_expiration,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => bail!("JWT_SECRET must be set in production"),
            _ => defaults.jwt_secret,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        let seed_default_drivers = env::var("SEED_DEFAULT_DRIVERS")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.seed_default_drivers);

        Ok(Self {
            environment,
            port,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration,
            cors_origins,
            seed_default_drivers,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
