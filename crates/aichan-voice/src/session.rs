//! **Session manager** — registration, turn sequencing, and the timestamp policy.
//!
//! A [`ChatSession`] can only be obtained through [`ChatSession::register`], so
//! holding one is proof the `appId` has been resolved; issuing a dialogue turn
//! on an unregistered session cannot be expressed. Beyond the `appId` the
//! session keeps no state: no history, no conversation id.

use crate::api::{ApiClient, SpeechOutcome};
use crate::error::ChatResult;
use tracing::{debug, info};

/// A registered chat session. Created once per process; every dialogue and
/// synthesis call reuses the `appId` obtained at registration.
pub struct ChatSession {
    api: ApiClient,
    app_id: String,
}

impl ChatSession {
    /// Register with the chatting service and return a ready session.
    /// Registration failure is fatal: there is no usable session to fall back to.
    pub fn register(api: ApiClient) -> ChatResult<Self> {
        let app_id = api.register()?;
        info!(app_id = %app_id, "chat session registered");
        Ok(Self { api, app_id })
    }

    /// The `appId` resolved at registration.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// One turn: send the user's text, return the assistant reply verbatim.
    pub fn exchange_turn(&self, input: &str) -> ChatResult<String> {
        let timestamp = self.turn_timestamp();
        let reply = self.api.dialogue(&self.app_id, input, &timestamp)?;
        debug!(chars = reply.chars().count(), "received dialogue reply");
        Ok(reply)
    }

    /// Synthesize a reply with the configured voice. Non-200 comes back as
    /// [`SpeechOutcome::Unavailable`] for the caller to branch on.
    pub fn synthesize(&self, reply: &str) -> ChatResult<SpeechOutcome> {
        self.api.text_to_speech(reply)
    }

    /// `appRecvTime`/`appSendTime` value for this turn. The upstream format is
    /// undocumented, so it is only populated when a format was configured.
    fn turn_timestamp(&self) -> String {
        match self.api.config().time_format {
            Some(ref fmt) => chrono::Local::now().format(fmt).to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    fn session_with(config: ChatConfig) -> ChatSession {
        // Bypasses the network for timestamp-policy tests; register() is the
        // only public way in.
        ChatSession {
            api: ApiClient::new(config).unwrap(),
            app_id: "test-app".to_string(),
        }
    }

    #[test]
    fn timestamp_empty_without_configured_format() {
        let session = session_with(ChatConfig::new("k").unwrap());
        assert_eq!(session.turn_timestamp(), "");
    }

    #[test]
    fn timestamp_follows_configured_format() {
        let config = ChatConfig::new("k").unwrap().with_time_format("%Y-%m-%d");
        let session = session_with(config);
        let stamp = session.turn_timestamp();
        // YYYY-MM-DD
        assert_eq!(stamp.len(), 10);
        assert_eq!(stamp.matches('-').count(), 2);
    }
}
