//! **Transport client** — signed JSON POSTs to the natural-chatting and Crayon endpoints.
//!
//! Both services authenticate via the `APIKEY` query parameter. Registration and
//! dialogue return JSON; textToSpeech returns raw audio bytes on 200 and nothing
//! useful otherwise, which is surfaced as [`SpeechOutcome`] rather than an error.

use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

const REGISTRATION_PATH: &str = "/naturalChatting/v1/registration";
const DIALOGUE_PATH: &str = "/naturalChatting/v1/dialogue";
const TEXT_TO_SPEECH_PATH: &str = "/crayon/v1/textToSpeech";

#[derive(Serialize)]
struct RegistrationRequest<'a> {
    #[serde(rename = "botId")]
    bot_id: &'a str,
    #[serde(rename = "appKind")]
    app_kind: &'a str,
}

#[derive(Serialize)]
struct DialogueRequest<'a> {
    language: &'a str,
    #[serde(rename = "botId")]
    bot_id: &'a str,
    #[serde(rename = "appId")]
    app_id: &'a str,
    #[serde(rename = "voiceText")]
    voice_text: &'a str,
    #[serde(rename = "appRecvTime")]
    app_recv_time: &'a str,
    #[serde(rename = "appSendTime")]
    app_send_time: &'a str,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    #[serde(rename = "Command")]
    command: &'a str,
    #[serde(rename = "SpeakerID")]
    speaker_id: &'a str,
    #[serde(rename = "StyleID")]
    style_id: &'a str,
    #[serde(rename = "PowerRate")]
    power_rate: &'a str,
    #[serde(rename = "AudioFileFormat")]
    audio_file_format: &'a str,
    #[serde(rename = "TextData")]
    text_data: &'a str,
}

#[derive(Deserialize)]
struct RegistrationResponse {
    #[serde(rename = "appId")]
    app_id: Option<String>,
}

#[derive(Deserialize)]
struct DialogueResponse {
    #[serde(rename = "systemText")]
    system_text: Option<SystemText>,
}

#[derive(Deserialize)]
struct SystemText {
    expression: Option<String>,
}

/// Result of a textToSpeech call. Non-200 is the service saying "no audio for
/// this turn", not a transport failure, so the caller branches instead of
/// unwinding.
#[derive(Debug, Clone)]
pub enum SpeechOutcome {
    /// Status 200: the exact response body bytes (an encoded audio clip).
    Audio(Vec<u8>),
    /// Any other status: no audio body was produced.
    Unavailable { status: StatusCode },
}

impl SpeechOutcome {
    /// Audio bytes if synthesis succeeded.
    pub fn audio(&self) -> Option<&[u8]> {
        match self {
            SpeechOutcome::Audio(bytes) => Some(bytes),
            SpeechOutcome::Unavailable { .. } => None,
        }
    }
}

/// Blocking HTTP client for the two remote services. One instance per process;
/// the underlying connection pool is reused across turns.
pub struct ApiClient {
    config: ChatConfig,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build the client with the configured request timeout.
    pub fn new(config: ChatConfig) -> ChatResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("HTTP client build failed: {}", e)))?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Register with the natural-chatting service and return the `appId`.
    /// Called exactly once per session, before any dialogue turn.
    pub fn register(&self) -> ChatResult<String> {
        let body = RegistrationRequest {
            bot_id: &self.config.bot_id,
            app_kind: &self.config.app_kind,
        };
        debug!(bot_id = %self.config.bot_id, "registering chat session");
        let res = self
            .client
            .post(self.url(REGISTRATION_PATH))
            .query(&[("APIKEY", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ChatError::Registration(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(ChatError::Registration(format!(
                "registration API error {}: {}",
                status, body
            )));
        }
        let text = res
            .text()
            .map_err(|e| ChatError::Registration(e.to_string()))?;
        app_id_from_response(&text)
    }

    /// One dialogue turn: send the user's text under `app_id` and return the
    /// assistant reply. `timestamp` fills `appRecvTime`/`appSendTime`; empty
    /// when no format is configured.
    pub fn dialogue(&self, app_id: &str, voice_text: &str, timestamp: &str) -> ChatResult<String> {
        let body = DialogueRequest {
            language: &self.config.language,
            bot_id: &self.config.bot_id,
            app_id,
            voice_text,
            app_recv_time: timestamp,
            app_send_time: timestamp,
        };
        let res = self
            .client
            .post(self.url(DIALOGUE_PATH))
            .query(&[("APIKEY", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ChatError::Dialogue(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(ChatError::Dialogue(format!(
                "dialogue API error {}: {}",
                status, body
            )));
        }
        let text = res.text().map_err(|e| ChatError::Dialogue(e.to_string()))?;
        reply_from_response(&text)
    }

    /// Synthesize `text` with the configured voice parameters. Returns the raw
    /// clip bytes on 200 and [`SpeechOutcome::Unavailable`] on any other status;
    /// only transport-level failures are errors.
    pub fn text_to_speech(&self, text: &str) -> ChatResult<SpeechOutcome> {
        let body = SpeechRequest {
            command: "AP_Synth",
            speaker_id: &self.config.speaker_id,
            style_id: &self.config.style_id,
            power_rate: &self.config.power_rate,
            audio_file_format: &self.config.audio_file_format,
            text_data: text,
        };
        let res = self
            .client
            .post(self.url(TEXT_TO_SPEECH_PATH))
            .query(&[("APIKEY", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ChatError::Synthesis(e.to_string()))?;
        let status = res.status();
        if status != StatusCode::OK {
            debug!(%status, "textToSpeech returned no audio");
            return Ok(SpeechOutcome::Unavailable { status });
        }
        let bytes = res
            .bytes()
            .map_err(|e| ChatError::Synthesis(e.to_string()))?;
        Ok(SpeechOutcome::Audio(bytes.to_vec()))
    }
}

fn app_id_from_response(body: &str) -> ChatResult<String> {
    let parsed: RegistrationResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::Registration(format!("malformed registration response: {}", e)))?;
    parsed
        .app_id
        .ok_or_else(|| ChatError::Registration("response has no appId".to_string()))
}

fn reply_from_response(body: &str) -> ChatResult<String> {
    let parsed: DialogueResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::Dialogue(format!("malformed dialogue response: {}", e)))?;
    parsed
        .system_text
        .and_then(|s| s.expression)
        .ok_or_else(|| ChatError::Dialogue("response has no systemText.expression".to_string()))
}
