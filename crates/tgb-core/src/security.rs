use std::collections::HashSet;

use crate::{domain::ChatId, types::Message};

// ============== Authorization ==============

/// Allowed-chat guard for message-mutating operations.
///
/// Matches on exact chat id only, never on chat type or title. Logs the reason
/// when a message is rejected.
pub fn is_message_allowed(message: Option<&Message>, allowed_chats: &HashSet<ChatId>) -> bool {
    let Some(message) = message else {
        tracing::warn!("nil message");
        return false;
    };
    if allowed_chats.contains(&message.chat.id) {
        return true;
    }
    tracing::warn!(chat_id = message.chat.id.0, "not allowed chat");
    false
}
