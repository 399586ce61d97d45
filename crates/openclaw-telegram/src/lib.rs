//! `openclaw-telegram` — the Telegram-compatible chat transport (§6.2) and
//! the channel poller built on top of it (§4.6): allowlist enforcement,
//! the fixed local-command shortlist, the implicit-answer rendezvous path,
//! and attachment persistence. Everything that does not require the full
//! classification ladder is handled here directly against `openclaw-store`
//! and `openclaw-dispatch`; anything else is forwarded over HTTP to the
//! router's `/route` endpoint, which is the one entry point this crate
//! does not reimplement.

pub mod allow;
pub mod client;
pub mod error;
pub mod local_commands;
pub mod offset;
pub mod poller;
pub mod types;

pub use client::{OwnerChannel, TelegramClient};
pub use error::{Result, TelegramError};
pub use local_commands::LocalCommands;
pub use poller::{run_tick, PollerConfig};
