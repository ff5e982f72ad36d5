use sqlx::PgPool;
use uuid::Uuid;

use crate::models::contact::{ContactMessage, ContactMessageInput};

pub async fn insert_message(
    pool: &PgPool,
    input: &ContactMessageInput,
) -> Result<ContactMessage, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (name, email, subject, message)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.email.trim())
    .bind(input.subject.trim())
    .bind(input.message.trim())
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_messages(pool: &PgPool) -> Result<Vec<ContactMessage>, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn delete_message(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
