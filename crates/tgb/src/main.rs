use std::time::Duration;

use anyhow::Context;

use tgb_core::{
    config::BotConfig,
    polling::{FileOffsetStore, OffsetStore, UpdateCursor},
};
use tgb_telegram::BotClient;

/// Pause between empty short polls (`POLL_TIMEOUT_SECS=0`).
const IDLE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tgb_core::logging::init("tgb")?;

    let cfg = BotConfig::load()?;
    let client = BotClient::from_config(&cfg)?;

    let me = client.get_me().await.context("getMe failed")?;
    tracing::info!(
        bot_id = me.id.0,
        username = me.username.as_deref().unwrap_or(""),
        allowed_chats = cfg.allowed_chats.len(),
        "bot identity confirmed"
    );

    let store = cfg.offset_file.clone().map(FileOffsetStore::new);
    let mut cursor = match &store {
        Some(s) => {
            let cursor = s.load()?.unwrap_or_default();
            tracing::info!(
                path = %s.path().display(),
                offset = cursor.offset(),
                "resuming from offset file"
            );
            cursor
        }
        None => UpdateCursor::default(),
    };

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let batch = tokio::select! {
            res = client.poll(cursor) => res.context("getUpdates failed")?,
            _ = &mut shutdown => break,
        };

        for update in &batch.updates {
            let message = update.message.as_ref();
            if !client.check_message(message) {
                continue;
            }
            if let Some(m) = message {
                tracing::info!(
                    update_id = update.update_id.0,
                    chat_id = m.chat.id.0,
                    from = m.from.as_ref().map(|u| u.id.0).unwrap_or_default(),
                    text = m.text.as_deref().unwrap_or(""),
                    "message"
                );
            }
        }

        // Persist after processing: a crash before this line redelivers the batch.
        if batch.next != cursor {
            if let Some(s) = &store {
                s.save(batch.next)?;
            }
        }
        cursor = batch.next;

        if shutdown_requested(&mut shutdown).await {
            break;
        }
        if batch.is_empty() && cfg.poll.timeout().is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(IDLE_DELAY) => {}
                _ = &mut shutdown => break,
            }
        }
    }

    tracing::info!(offset = cursor.offset(), "shutting down");
    Ok(())
}

/// Non-blocking check for a Ctrl-C that arrived while a batch was processed.
async fn shutdown_requested<F>(shutdown: &mut std::pin::Pin<&mut F>) -> bool
where
    F: std::future::Future,
{
    tokio::select! {
        biased;
        _ = shutdown.as_mut() => true,
        _ = std::future::ready(()) => false,
    }
}
