use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

/// Idempotent DDL for both submission tables.
///
/// The `(email, md5(message))` unique index is what turns a repeated contact
/// message into a no-op insert. Hashing keeps long messages under the btree
/// row-size limit.
const SCHEMA: &[(&str, &str)] = &[
    (
        "contact_messages",
        r#"
        CREATE TABLE IF NOT EXISTS contact_messages (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "contact_messages_email_message_key",
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS contact_messages_email_message_key
            ON contact_messages (email, md5(message))
        "#,
    ),
    (
        "contact_messages_email_created_idx",
        r#"
        CREATE INDEX IF NOT EXISTS contact_messages_email_created_idx
            ON contact_messages (lower(email), created_at DESC)
        "#,
    ),
    (
        "service_requests",
        r#"
        CREATE TABLE IF NOT EXISTS service_requests (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(20),
            service VARCHAR(50) NOT NULL,
            sub_details TEXT,
            details TEXT,
            budget INTEGER CHECK (budget >= 0),
            priority SMALLINT NOT NULL DEFAULT 3 CHECK (priority BETWEEN 1 AND 5),
            platform VARCHAR(50),
            attachment_link TEXT,
            notes TEXT,
            deadline DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "service_requests_email_created_idx",
        r#"
        CREATE INDEX IF NOT EXISTS service_requests_email_created_idx
            ON service_requests (lower(email), created_at DESC)
        "#,
    ),
];

pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    for (object, ddl) in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("failed to create {object}"))?;
    }

    info!("Database schema ready.");
    Ok(())
}
