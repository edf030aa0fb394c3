//! Request parameter shapes, serialized with the service's parameter names.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, UserId};

pub const GET_ME: &str = "getMe";
pub const SEND_MESSAGE: &str = "sendMessage";
pub const KICK_CHAT_MEMBER: &str = "kickChatMember";
pub const GET_CHAT_MEMBER: &str = "getChatMember";
pub const GET_UPDATES: &str = "getUpdates";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageParams {
    pub chat_id: ChatId,
    pub text: String,
}

/// Shared by `kickChatMember` and `getChatMember`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemberParams {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUpdatesParams {
    pub offset: i64,
    pub limit: u8,
    /// Long-poll timeout in seconds; 0 means short polling.
    pub timeout: u64,
}
