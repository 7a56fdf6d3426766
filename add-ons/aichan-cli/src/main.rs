//! aichan — interactive voice chat loop.
//!
//! Reads a line from stdin, sends it to the natural-chatting API, prints the
//! reply, synthesizes it via the Crayon API, and plays the clip before asking
//! for the next line. Registration and configuration failures end the process;
//! per-turn failures are logged and the loop continues. Exit with Ctrl+C or EOF.

use aichan_voice::{ApiClient, ChatConfig, ChatSession, SpeechOutcome, VoiceOutput};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Load .env if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[aichan] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ChatConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration failed");
            return ExitCode::FAILURE;
        }
    };
    let artifact_path = config.artifact_path.clone();

    let api = match ApiClient::new(config) {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, "HTTP client setup failed");
            return ExitCode::FAILURE;
        }
    };

    let session = match ChatSession::register(api) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "registration failed");
            return ExitCode::FAILURE;
        }
    };

    // Audio output is process-wide state: acquired once here, torn down on exit.
    let voice_output = match VoiceOutput::new(artifact_path) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "audio output unavailable");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(app_id = %session.app_id(), "chat ready; Ctrl+C or EOF to quit");
    chat_loop(&session, &voice_output);
    ExitCode::SUCCESS
}

/// Read-chat-speak loop. Only stdin EOF (or process interruption) ends it.
fn chat_loop(session: &ChatSession, voice_output: &VoiceOutput) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">>");
        let _ = io::stdout().flush();

        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
            None => break,
        };
        if input.trim().is_empty() {
            continue;
        }

        let reply = match session.exchange_turn(input.trim()) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "turn failed; try again");
                continue;
            }
        };
        println!("AIちゃん: {}", reply);

        match session.synthesize(&reply) {
            Ok(SpeechOutcome::Audio(bytes)) => {
                if let Err(e) = voice_output.play_reply(&bytes) {
                    tracing::warn!(error = %e, "playback failed");
                }
            }
            Ok(SpeechOutcome::Unavailable { status }) => {
                tracing::warn!(%status, "no audio for this reply");
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
            }
        }
    }
}
