//! KodiVoice Library
//!
//! Resolves loose, voice-style queries ("play random episode of futurama")
//! against a Kodi library and dispatches the matching playback commands.

pub mod channels;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod library;
pub mod players;
pub mod processor;
pub mod request;
pub mod selection;
pub mod server;
pub mod utils;
