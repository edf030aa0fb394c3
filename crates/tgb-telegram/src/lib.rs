//! Telegram adapter.
//!
//! `HttpTransport` implements the `tgb-core` transport port over `reqwest`;
//! `BotClient` exposes one typed method per Bot API call on top of it.

pub mod client;
pub mod http;
pub mod messaging;

pub use client::BotClient;
pub use http::HttpTransport;
pub use messaging::{KickFailureHook, LogOnly, MessagingPort, NotifyChat};
