//! Collaborators the deck depends on.
//!
//! The host supplies the words to study, records learned words and plays
//! pronunciation audio. None of these calls can fail from the deck's point
//! of view: a missing record simply degrades what is shown.

use crate::types::{StudySet, WordDetail, WordId};

/// Read access to the words still to be studied.
pub trait WordSource {
    /// Current study set. Called again after every decision.
    fn study_set(&self) -> StudySet;

    /// Detail record for a word, looked up when its card is revealed.
    fn word_detail(&self, word: &WordId) -> Option<WordDetail>;
}

/// Receives "remember" decisions.
pub trait LearnedSink {
    fn mark_learned(&mut self, word: &WordId);
}

/// Fire-and-forget audio playback keyed by a resource reference.
pub trait AudioPlayer {
    fn play(&mut self, audio_ref: &str);
}
