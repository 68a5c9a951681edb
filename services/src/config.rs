use crate::share::MAILPIT_API_URL;
use serde::Deserialize;
use std::env::vars;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Env {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "prod")]
    Prod,
}

impl Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Test => write!(f, "test"),
            Env::Prod => write!(f, "prod"),
        }
    }
}

/// Which [`GalleryStore`](crate::store::GalleryStore) implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StoreBackend {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "postgres")]
    Postgres,
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

pub const DEFAULT_MAIL_FROM: &str = "noreply@gallerypro.com";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

// The final, validated configuration struct.
#[derive(Debug, Clone)]
pub struct Config {
    env: Env,
    server_addr: String,
    port: u16,
    store_backend: StoreBackend,
    // Present whenever the backend is postgres.
    database_url: Option<String>,
    upload_dir: PathBuf,
    seed_demo_data: bool,
    mail_api_key: Option<String>,
    mail_api_url: Option<String>,
    mail_from: String,
    public_base_url: Option<String>,
}

// An intermediate struct for deserializing environment variables
// before defaults are applied.
#[derive(Deserialize)]
struct RawConfig {
    env: Env,
    server_addr: Option<String>,
    port: Option<u16>,
    store_backend: Option<StoreBackend>,
    database_url: Option<String>,
    upload_dir: Option<String>,
    seed_demo_data: Option<bool>,
    mail_api_key: Option<String>,
    mail_api_url: Option<String>,
    mail_from: Option<String>,
    public_base_url: Option<String>,
}

impl Config {
    /// Create a test configuration with default values.
    ///
    /// Uses the memory backend and does not seed demo data.
    pub fn new_for_test() -> Self {
        Self {
            env: Env::Local,
            server_addr: "127.0.0.1".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            database_url: None,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            seed_demo_data: false,
            mail_api_key: None,
            mail_api_url: None,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            public_base_url: None,
        }
    }

    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }

    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    #[cfg(test)]
    pub fn new_for_test_with_env(env: Env) -> Self {
        Self {
            env,
            ..Self::new_for_test()
        }
    }

    pub fn environment(&self) -> &Env {
        &self.env
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }

    pub fn mail_api_key(&self) -> Option<&str> {
        self.mail_api_key.as_deref()
    }

    pub fn mail_api_url(&self) -> Option<&str> {
        self.mail_api_url.as_deref()
    }

    pub fn mail_from(&self) -> &str {
        &self.mail_from
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    pub fn is_local(&self) -> bool {
        matches!(self.env, Env::Local)
    }

    /// Initializes configuration by reading from environment variables
    /// and applying environment-aware defaults.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");

        let raw_config: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            env,
            server_addr,
            port,
            store_backend,
            database_url,
            upload_dir,
            seed_demo_data,
            mail_api_key,
            mail_api_url,
            mail_from,
            public_base_url,
        } = raw_config;

        let server_addr = match server_addr {
            Some(addr) => {
                info!("Using provided SERVER_ADDR: {}", addr);
                addr
            }
            None => {
                let default_addr = match env {
                    Env::Local => "127.0.0.1",
                    _ => "0.0.0.0",
                };
                info!(
                    "SERVER_ADDR not set, defaulting to {} for {} environment",
                    default_addr, env
                );
                default_addr.to_string()
            }
        };

        let port = match port {
            Some(port) => port,
            None if matches!(env, Env::Local) => {
                info!("PORT not set, defaulting to 8080 for local environment");
                8080
            }
            None => anyhow::bail!("PORT must be set for {} environment", env),
        };

        let store_backend = store_backend.unwrap_or(match env {
            Env::Prod => StoreBackend::Postgres,
            Env::Local | Env::Test => StoreBackend::Memory,
        });

        if matches!(env, Env::Prod) && store_backend == StoreBackend::Memory {
            anyhow::bail!("STORE_BACKEND=memory is not allowed for {} environment", env);
        }

        let database_url = database_url.filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set for the postgres store backend");
        }

        let seed_demo_data =
            seed_demo_data.unwrap_or(store_backend == StoreBackend::Memory);

        let mail_api_key = mail_api_key.filter(|key| !key.trim().is_empty());
        if mail_api_key.is_none() {
            info!(
                "MAIL_API_KEY not set, share emails go to {}",
                mail_api_url.as_deref().unwrap_or(MAILPIT_API_URL)
            );
        }

        let public_base_url = public_base_url.map(|url| url.trim_end_matches('/').to_string());

        Ok(Config {
            env,
            server_addr,
            port,
            store_backend,
            database_url,
            upload_dir: PathBuf::from(upload_dir.unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())),
            seed_demo_data,
            mail_api_key,
            mail_api_url,
            mail_from: mail_from.unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            public_base_url,
        })
    }
}
