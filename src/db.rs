use anyhow::{anyhow, Context};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket_sync_db_pools::database;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("sitrep")]
pub struct SitrepDb(diesel::SqliteConnection);

/// Opens a single connection outside the rocket pool, with the same pragmas
/// the pool sets on checkout.
pub fn connect(url: &str) -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(url)
        .with_context(|| format!("failed to open database at {url}"))?;
    conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 1000;")
        .context("failed to set connection pragmas")?;
    Ok(conn)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
    Ok(())
}
