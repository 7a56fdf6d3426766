//! Integration tests for the chat client.
//!
//! Note: tests touching the audio device or the live APIs are ignored by
//! default; they need hardware / a real AICHAN_API_KEY.

use aichan_voice::{ApiClient, ChatConfig, ChatError, ChatSession, TempClip, VoiceOutput};
use std::fs;

#[test]
fn config_from_env_round_trip() {
    // One test mutates all AICHAN_* vars so parallel tests don't race on them.
    std::env::set_var("AICHAN_API_KEY", "integration-key");
    std::env::set_var("AICHAN_API_BASE", "https://chat.example.invalid/");
    std::env::set_var("AICHAN_BOT_ID", "TestBot");
    std::env::set_var("AICHAN_SPEAKER_ID", "3");
    std::env::set_var("AICHAN_TIME_FORMAT", "%Y-%m-%d %H:%M:%S");
    std::env::set_var("AICHAN_HTTP_TIMEOUT_SECS", "5");

    let config = ChatConfig::from_env().expect("config should load");
    assert_eq!(config.api_key, "integration-key");
    assert_eq!(config.base_url, "https://chat.example.invalid");
    assert_eq!(config.bot_id, "TestBot");
    assert_eq!(config.speaker_id, "3");
    assert_eq!(config.time_format.as_deref(), Some("%Y-%m-%d %H:%M:%S"));
    assert_eq!(config.http_timeout.as_secs(), 5);

    std::env::remove_var("AICHAN_API_KEY");
    std::env::remove_var("AICHAN_API_BASE");
    std::env::remove_var("AICHAN_BOT_ID");
    std::env::remove_var("AICHAN_SPEAKER_ID");
    std::env::remove_var("AICHAN_TIME_FORMAT");
    std::env::remove_var("AICHAN_HTTP_TIMEOUT_SECS");

    let err = ChatConfig::from_env().unwrap_err();
    assert!(matches!(err, ChatError::Config(_)));
}

#[test]
fn artifact_lifecycle_leaves_no_residue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reply.aac");

    {
        let clip = TempClip::write(&path, b"first clip").unwrap();
        assert!(clip.path().exists());
    }
    assert!(!path.exists(), "clip should be removed when the guard drops");

    // A second clip reuses the same name; at most one artifact exists at a time.
    let clip = TempClip::write(&path, b"second clip").unwrap();
    assert_eq!(fs::read(clip.path()).unwrap(), b"second clip");
    drop(clip);
    assert!(!path.exists());
}

#[test]
fn registration_failure_is_fatal_dialogue_failure_is_not() {
    let registration = ChatError::Registration("response has no appId".into());
    let dialogue = ChatError::Dialogue("response has no systemText.expression".into());
    assert!(registration.is_fatal());
    assert!(!dialogue.is_fatal());
}

// Plays a real clip through the default output device.
#[test]
#[ignore]
fn playback_removes_artifact_on_success() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reply.wav");
    let output = VoiceOutput::new(&path).expect("audio device");

    // 100ms of silence, 16kHz mono s16le WAV.
    let mut wav = Vec::new();
    let samples: u32 = 1600;
    let data_len = samples * 2;
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&16000u32.to_le_bytes());
    wav.extend_from_slice(&32000u32.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend(std::iter::repeat(0u8).take(data_len as usize));

    output.play_reply(&wav).expect("playback");
    assert!(!path.exists(), "artifact must be gone after playback");
}

// Full round trip against the live services; needs a real key in the env.
#[test]
#[ignore]
fn live_register_and_exchange_turn() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config = ChatConfig::from_env().expect("set AICHAN_API_KEY to run this");
    let api = ApiClient::new(config).unwrap();
    let session = ChatSession::register(api).expect("registration");
    assert!(!session.app_id().is_empty());

    let reply = session.exchange_turn("こんにちは").expect("dialogue");
    assert!(!reply.is_empty());
}
