use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Queue a mail for delivery. Callers treat this as fire-and-forget: a
/// failure is logged and never rolls back the transaction that triggered it.
pub async fn send_email(
    pool: &DbPool,
    user_id: Option<Uuid>,
    recipient: &str,
    subject: &str,
    body: &str,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO email_outbox (id, user_id, recipient, subject, body)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(recipient)
    .bind(subject)
    .bind(body)
    .execute(pool)
    .await?;

    tracing::info!(recipient = %recipient, subject = %subject, "email queued");
    Ok(())
}
