//! # aichan-voice — talk to the Docomo chatting bot, hear it answer
//!
//! Thin client for the natural-chatting and Crayon text-to-speech APIs:
//! register once for an `appId`, exchange free-text turns, synthesize each
//! reply, play it through the default output device.
//!
//! ## Flow
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Chat loop (CLI)                      │
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐   │
//! │  │  stdin    │ → │ ChatSession  │ → │  /dialogue      │   │
//! │  │  line     │   │  (appId)     │   │  reply text     │   │
//! │  └───────────┘   └──────┬───────┘   └─────────────────┘   │
//! │                         ↓                                  │
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐   │
//! │  │ VoiceOut  │ ← │ temp artifact│ ← │ /textToSpeech   │   │
//! │  │  (rodio)  │   │ (write→play→ │   │  audio bytes    │   │
//! │  └───────────┘   │   delete)    │   └─────────────────┘   │
//! │                  └──────────────┘                          │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod voice_output;

pub use api::{ApiClient, SpeechOutcome};
pub use config::ChatConfig;
pub use error::{ChatError, ChatResult};
pub use session::ChatSession;
pub use voice_output::{TempClip, VoiceOutput};
