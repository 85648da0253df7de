use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub db: DbConfig,
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub pool_max: u32,
    pub acquire_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or_parse("PORT", 3000),
            cors_origins: split_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173,http://127.0.0.1:5173",
            )),
            db: DbConfig {
                url: env_or("DATABASE_URL", "sqlite://data/database.sqlite?mode=rwc"),
                pool_max: env_or_parse("DB_POOL_MAX", 10),
                acquire_timeout_secs: env_or_parse("DB_ACQUIRE_TIMEOUT_SECS", 10),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
