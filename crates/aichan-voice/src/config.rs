//! Client configuration loaded from `.env` / environment.
//!
//! Bot id, voice parameters, and the artifact path are env toggles, so behavior
//! changes without code edits. Only the API key is required.

use crate::error::{ChatError, ChatResult};
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL for both the natural-chatting and Crayon TTS services.
pub const DEFAULT_API_BASE: &str = "https://api.apigw.smt.docomo.ne.jp";

/// Client configuration loaded from environment.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | AICHAN_API_KEY | (required) | API key sent as the `APIKEY` query parameter. |
/// | AICHAN_API_BASE | api.apigw.smt.docomo.ne.jp | Base URL without trailing slash. |
/// | AICHAN_BOT_ID | Chatting | `botId` for registration and dialogue. |
/// | AICHAN_LANGUAGE | ja-JP | Dialogue `language`. |
/// | AICHAN_SPEAKER_ID | 1 | Crayon `SpeakerID`. |
/// | AICHAN_STYLE_ID | 1 | Crayon `StyleID`. |
/// | AICHAN_POWER_RATE | 5.00 | Crayon `PowerRate`. |
/// | AICHAN_AUDIO_FORMAT | 0 | Crayon `AudioFileFormat`. |
/// | AICHAN_ARTIFACT_PATH | $TMPDIR/aichan_reply.aac | Temp clip written before playback. |
/// | AICHAN_TIME_FORMAT | unset | strftime format for `appRecvTime`/`appSendTime`; unset sends them empty. |
/// | AICHAN_HTTP_TIMEOUT_SECS | 60 | Request timeout for all three endpoints. |
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API key for both services; sent as the `APIKEY` query parameter.
    pub api_key: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// `botId` used for registration and every dialogue turn.
    pub bot_id: String,
    /// `appKind` sent at registration.
    pub app_kind: String,
    /// Dialogue `language` (BCP 47).
    pub language: String,
    /// Crayon voice parameters, passed through verbatim.
    pub speaker_id: String,
    pub style_id: String,
    pub power_rate: String,
    pub audio_file_format: String,
    /// Path of the single temporary audio artifact.
    pub artifact_path: PathBuf,
    /// strftime format for the dialogue timestamp fields. The upstream format is
    /// undocumented, so this is opt-in; when None the fields are sent empty.
    pub time_format: Option<String>,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl ChatConfig {
    /// Build with an explicit API key and defaults everywhere else.
    pub fn new(api_key: impl Into<String>) -> ChatResult<Self> {
        let key = api_key.into().trim().to_string();
        if key.is_empty() {
            return Err(ChatError::Config("API key is empty".to_string()));
        }
        Ok(Self {
            api_key: key,
            base_url: DEFAULT_API_BASE.to_string(),
            bot_id: "Chatting".to_string(),
            app_kind: "0".to_string(),
            language: "ja-JP".to_string(),
            speaker_id: "1".to_string(),
            style_id: "1".to_string(),
            power_rate: "5.00".to_string(),
            audio_file_format: "0".to_string(),
            artifact_path: std::env::temp_dir().join("aichan_reply.aac"),
            time_format: None,
            http_timeout: Duration::from_secs(60),
        })
    }

    /// Load from environment. `AICHAN_API_KEY` is required; everything else
    /// defaults per the table above.
    pub fn from_env() -> ChatResult<Self> {
        let api_key = std::env::var("AICHAN_API_KEY")
            .map_err(|_| ChatError::Config("AICHAN_API_KEY not set".to_string()))?;
        let mut config = Self::new(api_key)?;
        if let Some(base) = env_opt_string("AICHAN_API_BASE") {
            config.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(v) = env_opt_string("AICHAN_BOT_ID") {
            config.bot_id = v;
        }
        if let Some(v) = env_opt_string("AICHAN_LANGUAGE") {
            config.language = v;
        }
        if let Some(v) = env_opt_string("AICHAN_SPEAKER_ID") {
            config.speaker_id = v;
        }
        if let Some(v) = env_opt_string("AICHAN_STYLE_ID") {
            config.style_id = v;
        }
        if let Some(v) = env_opt_string("AICHAN_POWER_RATE") {
            config.power_rate = v;
        }
        if let Some(v) = env_opt_string("AICHAN_AUDIO_FORMAT") {
            config.audio_file_format = v;
        }
        if let Some(v) = env_opt_string("AICHAN_ARTIFACT_PATH") {
            config.artifact_path = PathBuf::from(v);
        }
        config.time_format = env_opt_string("AICHAN_TIME_FORMAT");
        if let Some(secs) = env_opt_string("AICHAN_HTTP_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                ChatError::Config(format!("AICHAN_HTTP_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.http_timeout = Duration::from_secs(secs.max(1));
        }
        Ok(config)
    }

    /// Override the artifact path (e.g. for tests).
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    /// Override the base URL (e.g. for a proxy).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.base_url = base.trim_end_matches('/').to_string();
        self
    }

    /// Opt in to populated dialogue timestamps with the given strftime format.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }
}

fn env_opt_string(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) => {
            let v = v.trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        }
        Err(_) => None,
    }
}
