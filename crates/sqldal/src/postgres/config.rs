use crate::error::{DalError, DalResult};
use std::time::Duration;

/// Connection settings for [`PgConnection`](super::PgConnection).
#[derive(Debug, Clone)]
pub struct PgConfig {
    inner: tokio_postgres::Config,
}

impl PgConfig {
    /// Host, database, user and password; other settings keep driver defaults.
    pub fn new(host: &str, database: &str, user: &str, password: &str) -> Self {
        let mut inner = tokio_postgres::Config::new();
        inner
            .host(host)
            .dbname(database)
            .user(user)
            .password(password);
        Self { inner }
    }

    /// Parse a `postgres://` URL or a `key=value` connection string.
    pub fn from_url(url: &str) -> DalResult<Self> {
        let inner = url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| DalError::Config(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Read the connection URL from `DATABASE_URL`.
    pub fn from_env() -> DalResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DalError::Config("DATABASE_URL is not set".to_string()))?;
        Self::from_url(&url)
    }

    pub fn port(mut self, port: u16) -> Self {
        self.inner.port(port);
        self
    }

    /// Reported to the server as `application_name`.
    pub fn application_name(mut self, name: &str) -> Self {
        self.inner.application_name(name);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.inner.connect_timeout(timeout);
        self
    }

    pub fn as_pg_config(&self) -> &tokio_postgres::Config {
        &self.inner
    }
}
