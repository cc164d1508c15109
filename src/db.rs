pub mod models;
pub mod schema;

use diesel::{Connection, PgConnection};
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/migrations");

#[derive(Error, Debug)]
pub enum DBError {
    #[error("failed to connect to database: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),
    #[error("failed to run migrations: {0}")]
    MigrationError(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to create database connection pool: {0}")]
    PoolCreationError(#[from] diesel_async::pooled_connection::deadpool::BuildError),
    #[error("failed to execute query: {0}")]
    DieselError(#[from] diesel::result::Error),
    #[error("failed to join migration task: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub fn run_migrations(database_url: &str) -> Result<(), DBError> {
    let mut connection = PgConnection::establish(database_url)?;
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Runs the migrations on a blocking task, since the migration harness is synchronous.
pub async fn run_migrations_blocking(database_url: &str) -> Result<(), DBError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&database_url)).await?
}

pub fn create_database_connection_pool(
    database_url: &str,
    max_size: Option<usize>,
) -> Result<Pool<AsyncPgConnection>, DBError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let builder = Pool::builder(manager);
    let builder = match max_size {
        Some(max_size) => builder.max_size(max_size),
        None => builder,
    };
    let pool = builder.build()?;
    Ok(pool)
}
