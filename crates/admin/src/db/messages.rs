//! Support conversation messages.

use bacoge_core::{ConversationId, MessageId, SenderType, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Message;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    conversation_id: ConversationId,
    sender_type: SenderType,
    sender_user_id: Option<UserId>,
    sender_name: Option<String>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_type: row.sender_type,
            sender_id: row.sender_user_id,
            sender_name: row.sender_name,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn conversation_exists(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let exists =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM conversations WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Messages of a conversation, oldest first, with the sender's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_type, m.sender_user_id,
                   NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS sender_name,
                   m.content, m.created_at, m.updated_at
            FROM messages m
            LEFT JOIN users u ON u.id = m.sender_user_id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at, m.id
            "#,
        )
        .bind(conversation_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}
