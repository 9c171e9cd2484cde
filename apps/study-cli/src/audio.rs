//! Audio playback stand-in for the terminal.

use word_deck_core::AudioPlayer;

/// Logs playback requests instead of producing sound.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    played: usize,
}

impl LoggingAudio {
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioPlayer for LoggingAudio {
    fn play(&mut self, audio_ref: &str) {
        self.played += 1;
        tracing::info!(audio_ref, "playing pronunciation");
    }
}
