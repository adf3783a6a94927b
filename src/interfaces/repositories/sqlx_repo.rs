use sqlx::PgPool;

/// Postgres-backed store for contact records. `pool` is `None` when no
/// database is configured; every call then fails with `NotConfigured`.
#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: Option<PgPool>,
}
