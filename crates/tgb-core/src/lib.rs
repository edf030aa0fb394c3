//! Core of a typed Telegram Bot API client.
//!
//! This crate is transport-agnostic. The HTTP adapter and the bot façade live in
//! `tgb-telegram`; everything here works against the `Transport` port.

pub mod config;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod invoker;
pub mod logging;
pub mod params;
pub mod polling;
pub mod security;
pub mod transport;
pub mod types;

pub use errors::{Error, Result};
