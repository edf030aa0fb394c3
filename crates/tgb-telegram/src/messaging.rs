use async_trait::async_trait;

use tgb_core::{
    domain::{ChatId, UserId},
    types::Message,
    Result,
};

/// Outbound text messaging, as needed by failure hooks.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<Message>;
}

/// Policy invoked when `kickChatMember` is rejected by the service.
///
/// Hooks must not fail the kick: their own errors are logged and swallowed.
#[async_trait]
pub trait KickFailureHook: Send + Sync {
    async fn on_kick_failed(
        &self,
        messenger: &dyn MessagingPort,
        chat_id: ChatId,
        user_id: UserId,
        description: &str,
    );
}

/// Sends the service's failure description back into the chat.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotifyChat;

#[async_trait]
impl KickFailureHook for NotifyChat {
    async fn on_kick_failed(
        &self,
        messenger: &dyn MessagingPort,
        chat_id: ChatId,
        user_id: UserId,
        description: &str,
    ) {
        if let Err(e) = messenger.send_text(chat_id, description).await {
            tracing::warn!(
                chat_id = chat_id.0,
                user_id = user_id.0,
                error = %e,
                "failed to report kick failure to chat"
            );
        }
    }
}

/// Leaves the failure in the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnly;

#[async_trait]
impl KickFailureHook for LogOnly {
    async fn on_kick_failed(
        &self,
        _messenger: &dyn MessagingPort,
        _chat_id: ChatId,
        _user_id: UserId,
        _description: &str,
    ) {
    }
}
