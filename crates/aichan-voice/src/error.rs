//! Error types for the aichan voice chat client

use thiserror::Error;

/// Result type alias for chat client operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors that can occur while talking to the remote services or playing audio
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Dialogue failed: {0}")]
    Dialogue(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Audio playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Whether this error should end the process. Registration and configuration
    /// failures leave no usable session; everything else is scoped to one turn
    /// and the loop can keep going.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChatError::Registration(_) | ChatError::Config(_))
    }
}
