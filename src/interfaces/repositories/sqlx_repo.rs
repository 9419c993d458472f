use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxContactMessageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxServiceRequestRepo {
    pub pool: PgPool,
}
