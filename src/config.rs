// src/config.rs

use std::{env, net::SocketAddr, time::Duration};
use dotenvy::dotenv;

const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Absent means demo mode.
    pub database_url: Option<String>,
    /// Shared secret for identity tokens. Required outside demo mode.
    pub jwt_secret: Option<String>,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Sessions unused for this long are dropped.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let jwt_secret = env::var("JWT_SECRET").ok();
        if database_url.is_some() && jwt_secret.is_none() {
            panic!("JWT_SECRET must be set when DATABASE_URL is configured");
        }

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address like 0.0.0.0:3000");

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_origins());

        let session_idle_timeout = env::var("SESSION_IDLE_SECS")
            .map(|secs| {
                secs.parse::<u64>()
                    .expect("SESSION_IDLE_SECS must be a whole number of seconds")
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_IDLE);

        Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            cors_origins,
            session_idle_timeout,
        }
    }

    /// Configuration with no backend: guest identity and in-memory store.
    pub fn demo() -> Self {
        Self {
            database_url: None,
            jwt_secret: None,
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: default_origins(),
            session_idle_timeout: DEFAULT_SESSION_IDLE,
        }
    }

    pub fn demo_mode(&self) -> bool {
        self.database_url.is_none()
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}
