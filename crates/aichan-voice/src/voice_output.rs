//! **VoiceOutput** — playback of synthesized replies via a single temp artifact.
//!
//! Owns the process-wide `rodio` output stream: create one instance before the
//! chat loop and keep it alive until exit; the audio subsystem is torn down on
//! drop. Each reply is written to one named temp file, played to completion
//! with a blocking wait, then removed. Removal is tied to [`TempClip`]'s `Drop`,
//! so the artifact is gone even when decoding or playback fails.

use crate::error::{ChatError, ChatResult};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Scoped handle to the temporary audio artifact. Writing creates the file
/// (overwriting any previous clip); dropping removes it.
pub struct TempClip {
    path: PathBuf,
}

impl TempClip {
    /// Write `bytes` to `path`, replacing whatever was there.
    pub fn write(path: &Path, bytes: &[u8]) -> ChatResult<Self> {
        fs::write(path, bytes)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the artifact while this guard is alive.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempClip {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "temp clip removal failed");
        }
    }
}

/// Plays synthesized replies on the default output device, one clip at a time.
pub struct VoiceOutput {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    artifact_path: PathBuf,
}

impl VoiceOutput {
    /// Acquire the default output device. Fails with `Playback` when no device
    /// is available (e.g. headless hosts).
    pub fn new(artifact_path: impl Into<PathBuf>) -> ChatResult<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| ChatError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle).map_err(|e| ChatError::Playback(e.to_string()))?;
        let artifact_path = artifact_path.into();
        info!(artifact = %artifact_path.display(), "audio output ready");
        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink,
            artifact_path,
        })
    }

    /// Where the temp clip is written between synthesis and playback.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Write `bytes` to the artifact, play the clip to completion (blocking),
    /// then remove the artifact. Empty input is a no-op. The guard removes the
    /// file on the error paths too.
    pub fn play_reply(&self, bytes: &[u8]) -> ChatResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let clip = TempClip::write(&self.artifact_path, bytes)?;
        let file = fs::File::open(clip.path())?;
        let source = rodio::Decoder::new(BufReader::new(file))
            .map_err(|e| ChatError::Playback(format!("decode failed: {}", e)))?;
        self.sink.append(source.convert_samples::<f32>());
        self.sink.sleep_until_end();
        debug!("reply playback finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_clip_written_then_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.aac");
        {
            let clip = TempClip::write(&path, b"RIFF....").unwrap();
            assert_eq!(fs::read(clip.path()).unwrap(), b"RIFF....");
        }
        assert!(!path.exists());
    }

    #[test]
    fn temp_clip_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.aac");
        fs::write(&path, b"old clip").unwrap();
        let clip = TempClip::write(&path, b"new").unwrap();
        assert_eq!(fs::read(clip.path()).unwrap(), b"new");
    }

    // Requires an audio output device; run manually with --ignored.
    #[test]
    #[ignore]
    fn undecodable_bytes_fail_but_artifact_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.aac");
        let output = VoiceOutput::new(&path).unwrap();
        let err = output.play_reply(b"not audio at all").unwrap_err();
        assert!(matches!(err, ChatError::Playback(_)));
        assert!(!path.exists());
    }

    #[test]
    #[ignore]
    fn empty_reply_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.aac");
        let output = VoiceOutput::new(&path).unwrap();
        output.play_reply(&[]).unwrap();
        assert!(!path.exists());
    }
}
