use sqlx::PgPool;

/// Runs entity queries against a connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
