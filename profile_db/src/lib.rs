use profile_core::error::ProfileError;

use anyhow::Context;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub mod profile_db;

#[derive(Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    pub async fn init(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .context("malformed database_url")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("could not connect to database_url")?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Db { pool })
    }

    /// A private, migrated in-memory database.
    ///
    /// Every connection to `sqlite::memory:` opens its own database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("could not open in-memory database")?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Db { pool })
    }
}

trait DbResultExt<T> {
    fn on_unique_violation(
        self,
        column: &str,
        f: impl FnOnce(Box<dyn DatabaseError>) -> ProfileError,
    ) -> Result<T, ProfileError>;
}

impl<T, E> DbResultExt<T> for Result<T, E>
where
    E: Into<ProfileError>,
{
    fn on_unique_violation(
        self,
        column: &str,
        map_err: impl FnOnce(Box<dyn DatabaseError>) -> ProfileError,
    ) -> Result<T, ProfileError> {
        self.map_err(|e| match e.into() {
            // SQLite reports the violated column as "UNIQUE constraint failed: table.column"
            ProfileError::Sqlx(sqlx::Error::Database(dbe))
                if dbe.kind() == ErrorKind::UniqueViolation && dbe.message().contains(column) =>
            {
                map_err(dbe)
            }
            e => e,
        })
    }
}
