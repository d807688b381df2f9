use sqlx::PgPool;

/// Postgres adapter behind both the task manager and credentials ports.
#[derive(Clone)]
pub struct Repository {
    pub(crate) pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
