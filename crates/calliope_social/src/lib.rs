//! Telegram publish channel.
//!
//! Implements the pipeline's [`Publisher`] seam over the Telegram Bot
//! API. The core hands this crate exactly the approved posts; a failure
//! on any post fails the whole batch, and the caller commits no status
//! transition.
//!
//! [`Publisher`]: calliope_pipeline::Publisher

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telegram;

pub use telegram::TelegramClient;
