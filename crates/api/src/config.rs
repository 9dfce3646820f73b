use crate::auth::jwt::JwtConfig;

/// Blob-store provider selection.
#[derive(Debug, Clone)]
pub enum StorageSettings {
    /// S3-compatible bucket, publicly served under `public_base_url`.
    S3 {
        bucket: String,
        public_base_url: String,
    },
    /// In-memory store for tests and local development.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Blob-store provider settings.
    pub storage: StorageSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORAGE_PROVIDER`     | `s3`                       |
    ///
    /// With `STORAGE_PROVIDER=s3`, `S3_BUCKET` and `S3_PUBLIC_BASE_URL` are
    /// required.
    ///
    /// # Panics
    ///
    /// Panics on malformed values or missing required variables. Startup is
    /// the right time to fail on misconfiguration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let storage = match std::env::var("STORAGE_PROVIDER")
            .unwrap_or_else(|_| "s3".into())
            .as_str()
        {
            "memory" => StorageSettings::Memory,
            "s3" => StorageSettings::S3 {
                bucket: std::env::var("S3_BUCKET").expect("S3_BUCKET must be set"),
                public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                    .expect("S3_PUBLIC_BASE_URL must be set"),
            },
            other => panic!("Unknown STORAGE_PROVIDER '{other}' (expected 's3' or 'memory')"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            storage,
        }
    }
}
