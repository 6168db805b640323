use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Lazy pool: connectivity is only exercised per request, so a store that is
/// down at startup surfaces as error-carrying responses, not a failed boot.
pub fn connect(url: &str) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new().max_connections(10).connect_lazy(url)?;
    Ok(pool)
}
