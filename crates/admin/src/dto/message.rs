use bacoge_core::{ConversationId, MessageId, SenderType, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Message;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: Option<UserId>,
    pub sender_name: String,
    pub content: String,
    pub message_type: SenderType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        let sender_name = message.sender_name.unwrap_or_else(|| {
            match message.sender_type {
                SenderType::Admin => "Support Bacoge",
                SenderType::User => "Visiteur",
                SenderType::System => "Système",
            }
            .to_string()
        });
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            sender_name,
            content: message.content,
            message_type: message.sender_type,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_gets_fallback_name() {
        let now = Utc::now();
        let dto = MessageDto::from(Message {
            id: MessageId::new(1),
            conversation_id: ConversationId::new(4),
            sender_type: SenderType::System,
            sender_id: None,
            sender_name: None,
            content: "Conversation ouverte".to_string(),
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["senderName"], "Système");
        assert_eq!(json["messageType"], "SYSTEM");
        assert!(json["senderId"].is_null());
    }
}
