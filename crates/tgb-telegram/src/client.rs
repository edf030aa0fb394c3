use std::collections::HashSet;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use tgb_core::{
    config::BotConfig,
    domain::{ChatId, UserId},
    envelope::Envelope,
    invoker::MethodInvoker,
    params::{
        ChatMemberParams, SendMessageParams, GET_CHAT_MEMBER, GET_ME, GET_UPDATES,
        KICK_CHAT_MEMBER, SEND_MESSAGE,
    },
    polling::{PollBatch, PollOptions, UpdateCursor},
    security,
    transport::Transport,
    types::{ChatMember, Message, Update, User},
    Result,
};

use crate::{
    http::HttpTransport,
    messaging::{KickFailureHook, MessagingPort, NotifyChat},
};

/// Typed Bot API client.
///
/// Holds no polling state: `get_updates`/`poll` take the cursor from the caller.
/// Safe to share between tasks as long as the transport is.
#[derive(Debug)]
pub struct BotClient<T = HttpTransport> {
    invoker: MethodInvoker<T>,
    allowed_chats: HashSet<ChatId>,
    poll: PollOptions,
}

impl BotClient<HttpTransport> {
    pub fn from_config(cfg: &BotConfig) -> Result<Self> {
        Ok(Self::new(cfg, HttpTransport::new()?))
    }
}

impl<T: Transport> BotClient<T> {
    pub fn new(cfg: &BotConfig, transport: T) -> Self {
        Self {
            invoker: MethodInvoker::new(cfg.api_base.clone(), cfg.bot_token.clone(), transport),
            allowed_chats: cfg.allowed_chats.clone(),
            poll: cfg.poll,
        }
    }

    pub fn transport(&self) -> &T {
        self.invoker.transport()
    }

    /// Guard for message-mutating operations: `false` for a missing message or a
    /// chat outside the allow-list. Never touches the network.
    pub fn check_message(&self, message: Option<&Message>) -> bool {
        security::is_message_allowed(message, &self.allowed_chats)
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call::<(), _>(GET_ME, None).await
    }

    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message> {
        let params = SendMessageParams {
            chat_id,
            text: text.to_string(),
        };
        self.call(SEND_MESSAGE, Some(&params)).await
    }

    /// Remove a member, reporting a rejection back into the chat.
    pub async fn kick_chat_member(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        self.kick_chat_member_with(chat_id, user_id, &NotifyChat)
            .await
    }

    /// Remove a member. `Ok(false)` when the service rejects the kick, after
    /// `on_failure` has run.
    pub async fn kick_chat_member_with(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        on_failure: &dyn KickFailureHook,
    ) -> Result<bool> {
        let params = ChatMemberParams { chat_id, user_id };
        let env: Envelope<bool> = self.invoker.call(KICK_CHAT_MEMBER, Some(&params)).await?;

        if env.ok {
            return Ok(true);
        }

        tracing::warn!(
            method = KICK_CHAT_MEMBER,
            chat_id = chat_id.0,
            user_id = user_id.0,
            description = env.description(),
            "not ok"
        );
        on_failure
            .on_kick_failed(self, chat_id, user_id, env.description())
            .await;
        Ok(false)
    }

    pub async fn get_chat_member(&self, chat_id: ChatId, user_id: UserId) -> Result<ChatMember> {
        let params = ChatMemberParams { chat_id, user_id };
        self.call(GET_CHAT_MEMBER, Some(&params)).await
    }

    /// Fetch updates with `update_id >= offset`. The caller computes the next
    /// offset; see [`BotClient::poll`] for the cursor-returning variant.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let params = UpdateCursor::new(offset).params(&self.poll);
        self.call(GET_UPDATES, Some(&params)).await
    }

    /// One polling round. Persist `next` before processing to get at-most-once
    /// delivery, after processing to get at-least-once.
    pub async fn poll(&self, cursor: UpdateCursor) -> Result<PollBatch> {
        let updates = self.get_updates(cursor.offset()).await?;
        let next = cursor.after(&updates);
        Ok(PollBatch { updates, next })
    }

    async fn call<P, R>(&self, method: &str, params: Option<&P>) -> Result<R>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let env: Envelope<R> = self.invoker.call(method, params).await?;
        if !env.ok {
            tracing::warn!(method, description = env.description(), "not ok");
        }
        env.into_result(method)
    }
}

#[async_trait]
impl<T: Transport> MessagingPort for BotClient<T> {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<Message> {
        self.send_message(chat_id, text).await
    }
}
