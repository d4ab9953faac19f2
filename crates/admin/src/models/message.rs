//! Support conversation messages.

use bacoge_core::{ConversationId, MessageId, SenderType, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_type: SenderType,
    pub sender_id: Option<UserId>,
    /// Sender's full name; `None` for system messages and guests.
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
