//! Speech output
//!
//! Responses are read aloud by an external synthesizer command named in the
//! `[speech]` config section. Without one, speaking reports an unsupported
//! capability and the caller keeps the text response.

use agri_common::config::SpeechConfig;
use agri_common::{Error, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// Speaking rate handed to the synthesizer
pub const SPEECH_RATE: f32 = 0.9;

/// Placeholder argument replaced by [`SPEECH_RATE`]
pub const RATE_PLACEHOLDER: &str = "{rate}";

/// Reported when no synthesizer is available
pub const SYNTHESIS_UNSUPPORTED: &str = "Text-to-speech is not supported in this environment.";

#[derive(Debug, Clone, Default)]
pub struct SpeechSynthesizer {
    command: Option<String>,
    args: Vec<String>,
}

impl SpeechSynthesizer {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            command: config
                .synthesis_command
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            args: config.args.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }

    /// Arguments for one invocation, text last
    fn invocation_args(&self, text: &str) -> Vec<String> {
        let rate = SPEECH_RATE.to_string();
        self.args
            .iter()
            .map(|a| if a == RATE_PLACEHOLDER { rate.clone() } else { a.clone() })
            .chain(std::iter::once(text.to_string()))
            .collect()
    }

    /// Speak `text`, waiting for the synthesizer to finish
    pub async fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Nothing to speak".to_string()));
        }

        let Some(command) = self.command.as_deref() else {
            return Err(Error::UnsupportedCapability(SYNTHESIS_UNSUPPORTED.to_string()));
        };

        debug!(command, chars = text.len(), "Speaking response");

        let status = Command::new(command)
            .args(self.invocation_args(text))
            .status()
            .await
            .map_err(|e| {
                warn!(command, error = %e, "Failed to start speech synthesizer");
                Error::UnsupportedCapability(SYNTHESIS_UNSUPPORTED.to_string())
            })?;

        if !status.success() {
            return Err(Error::Internal(format!(
                "Speech synthesizer exited with {}",
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer(command: Option<&str>, args: &[&str]) -> SpeechSynthesizer {
        SpeechSynthesizer::from_config(&SpeechConfig {
            synthesis_command: command.map(str::to_string),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_unconfigured_is_unsupported() {
        let speech = synthesizer(None, &[]);
        assert!(!speech.is_available());
        match speech.speak("hello").await {
            Err(Error::UnsupportedCapability(msg)) => assert_eq!(msg, SYNTHESIS_UNSUPPORTED),
            other => panic!("expected UnsupportedCapability, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_command_is_unsupported() {
        assert!(!synthesizer(Some("  "), &[]).is_available());
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid_input() {
        let speech = synthesizer(Some("true"), &[]);
        assert!(matches!(speech.speak("   ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_executable_is_unsupported() {
        let speech = synthesizer(Some("/nonexistent/agri-speech-synth"), &[]);
        assert!(matches!(
            speech.speak("hello").await,
            Err(Error::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn test_rate_placeholder_substituted() {
        let speech = synthesizer(Some("espeak"), &["-s", RATE_PLACEHOLDER]);
        assert_eq!(speech.invocation_args("water daily"), vec!["-s", "0.9", "water daily"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let speech = synthesizer(Some("true"), &[]);
        assert!(speech.speak("hello").await.is_ok());
    }
}
