//! Support conversation API handlers.

use axum::{Json, Router, extract::State, routing::get};
use bacoge_core::ConversationId;

use crate::{
    db::MessageRepository,
    dto::MessageDto,
    error::AppError,
    extract::ApiPath,
    middleware::auth::RequireAdminAuth,
    state::AppState,
};

/// Build the conversations router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/admin/api/conversations/{id}/messages",
        get(conversation_messages),
    )
}

/// Messages of one conversation, oldest first.
///
/// GET /admin/api/conversations/{id}/messages
async fn conversation_messages(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ConversationId>,
) -> Result<Json<Vec<MessageDto>>, AppError> {
    let repo = MessageRepository::new(state.pool());
    if !repo.conversation_exists(id).await? {
        return Err(AppError::NotFound(format!("Conversation {id} not found")));
    }

    let messages = repo.list_for_conversation(id).await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}
