//! Database bootstrap: create the target database when missing, open the pool, check connectivity.

use crate::settings::Settings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    let Some((admin_url, db_name)) = split_database_url(database_url) else {
        return Ok(());
    };
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = PgConnectOptions::from_str(&admin_url)?.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", crate::sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://.../name?opts` into the same URL pointing at `postgres` (query kept) and `name`.
fn split_database_url(url: &str) -> Option<(String, String)> {
    let scheme_end = url.find("://")? + 3;
    let (path_part, query) = match url.find('?') {
        Some(q) => (&url[..q], &url[q..]),
        None => (url, ""),
    };
    let slash = path_part[scheme_end..].rfind('/')? + scheme_end;
    let db_name = path_part[slash + 1..].trim().to_string();
    let admin_url = format!("{}/postgres{}", &path_part[..slash], query);
    Some((admin_url, db_name))
}

/// Open the shared pool with the configured size and acquire timeout.
pub async fn connect(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(settings.db_acquire_timeout_secs))
        .connect(&settings.database_url)
        .await
}

/// `SELECT 1` round trip.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_database_url() {
        let (admin, name) = split_database_url("postgres://u:p@localhost:5432/sitewatch").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "sitewatch");
    }

    #[test]
    fn test_split_keeps_query() {
        let (admin, name) = split_database_url("postgres://localhost/site_db?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(name, "site_db");
    }

    #[test]
    fn test_split_without_database() {
        assert!(split_database_url("postgres://localhost").is_none());
        assert!(split_database_url("not a url").is_none());
    }
}
