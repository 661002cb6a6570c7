use superheroes_source::DEFAULT_API_URL;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/superheroes";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                             |
    /// |------------------------|-------------------------------------|
    /// | `DATABASE_URL`         | `postgres://localhost/superheroes`  |
    /// | `HOST`                 | `0.0.0.0`                           |
    /// | `PORT`                 | `8000`                              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                |
    pub fn from_env() -> Self {
        let database_url = database_url_from_env();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
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

        Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

/// Configuration for the `superheroes-load` binary.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Base URL of the hero catalog.
    pub api_url: String,
}

impl LoadConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var        | Default                                        |
    /// |----------------|------------------------------------------------|
    /// | `DATABASE_URL` | `postgres://localhost/superheroes`             |
    /// | `HERO_API_URL` | `https://akabab.github.io/superhero-api/api`   |
    pub fn from_env() -> Self {
        Self {
            database_url: database_url_from_env(),
            api_url: std::env::var("HERO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
        }
    }
}

fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into())
}
