use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::{parse_env_or, DatabaseConfig};
use crate::error::Result;

use super::schema;

/// SQLite pragmas applied once at startup. Read from the environment so a
/// deployment can trade durability for speed without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pragmas {
    pub busy_timeout_ms: u64,
    pub journal_mode: &'static str,
    pub synchronous: &'static str,
}

impl Pragmas {
    fn from_env() -> Self {
        Self {
            busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
            journal_mode: normalize_journal_mode(
                &std::env::var("DATABASE_JOURNAL_MODE").unwrap_or_default(),
            ),
            synchronous: normalize_synchronous(
                &std::env::var("DATABASE_SYNCHRONOUS").unwrap_or_default(),
            ),
        }
    }

    fn statements(&self) -> [(&'static str, String); 3] {
        [
            ("busy_timeout", self.busy_timeout_ms.to_string()),
            ("journal_mode", self.journal_mode.to_string()),
            ("synchronous", self.synchronous.to_string()),
        ]
    }
}

#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    pragmas: Pragmas,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = open(config).await?;

        let database = Self {
            db: Arc::new(db),
            pragmas: Pragmas::from_env(),
        };
        database.apply_pragmas().await;

        let conn = database.connect()?;
        schema::init_schema(&conn).await?;

        tracing::info!(url = %redact_url(&config.url), "Database ready");
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Pull from the primary when running as an embedded replica. A failed
    /// sync is not fatal: local reads keep working.
    pub async fn sync(&self) -> Result<()> {
        match self.db.sync().await {
            Ok(replicated) => tracing::debug!(?replicated, "Database synced"),
            Err(e) => tracing::debug!(error = %e, "Database sync skipped"),
        }
        Ok(())
    }

    /// Round-trip a trivial query. Used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.connect()?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    async fn apply_pragmas(&self) {
        let conn = match self.connect() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Could not open connection to apply pragmas");
                return;
            }
        };

        for (name, value) in self.pragmas.statements() {
            let sql = format!("PRAGMA {name} = {value}");
            if let Err(error) = conn.execute_batch(&sql).await {
                tracing::warn!(pragma = name, value = %value, error = %error, "Failed to set SQLite pragma");
            }
        }
    }
}

async fn open(config: &DatabaseConfig) -> Result<libsql::Database> {
    let remote = config.url.starts_with("libsql://") || config.url.starts_with("https://");
    let token = config.auth_token.clone().unwrap_or_default();

    let db = match (remote, config.local_path.as_ref()) {
        (true, Some(local_path)) => {
            Builder::new_remote_replica(local_path, config.url.clone(), token)
                .build()
                .await?
        }
        (true, None) => Builder::new_remote(config.url.clone(), token).build().await?,
        (false, _) => {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        }
    };

    Ok(db)
}

fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}
