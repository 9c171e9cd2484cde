//! Shared fixtures for study session tests.
//!
//! Provides an in-memory word store that records every learned word and an
//! audio player that records every playback request.

use word_deck_core::{
    AudioPlayer, DeckRng, DeckSettings, LearnedSink, StudySession, StudySet, WordDetail, WordEntry,
    WordId, WordSource,
};

/// Viewport width used throughout; the swipe threshold is about 260.9.
pub const WIDTH: f32 = 600.0;

/// Words held in memory; learned entries drop out of the study set.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub entries: Vec<WordEntry>,
    pub learned: Vec<WordId>,
    /// Words whose detail lookup returns nothing.
    pub missing_detail: Vec<WordId>,
}

impl RecordingStore {
    pub fn with_words(words: &[&str]) -> Self {
        Self {
            entries: words.iter().map(|w| entry(w)).collect(),
            ..Default::default()
        }
    }

    /// Drop a word as if another screen had removed it.
    pub fn remove(&mut self, word: &str) {
        self.entries.retain(|e| e.word.as_str() != word);
    }
}

impl WordSource for RecordingStore {
    fn study_set(&self) -> StudySet {
        StudySet::unlearned(&self.entries).expect("fixture words are unique")
    }

    fn word_detail(&self, word: &WordId) -> Option<WordDetail> {
        if self.missing_detail.contains(word) {
            return None;
        }
        self.entries.iter().find(|e| &e.word == word).map(WordEntry::detail)
    }
}

impl LearnedSink for RecordingStore {
    fn mark_learned(&mut self, word: &WordId) {
        self.learned.push(word.clone());
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.word == word) {
            entry.learned = true;
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<String>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, audio_ref: &str) {
        self.played.push(audio_ref.to_string());
    }
}

/// Entry with every display field filled in.
pub fn entry(word: &str) -> WordEntry {
    WordEntry {
        word: WordId::from(word),
        phonetics: Some(format!("/{word}/")),
        meaning: Some(format!("meaning of {word}")),
        image: Some(format!("{word}.png")),
        audio: Some(format!("{word}.mp3")),
        learned: false,
    }
}

pub type Session = StudySession<RecordingStore, RecordingAudio>;

pub fn session(store: RecordingStore) -> Session {
    StudySession::new(store, RecordingAudio::default(), DeckSettings::default(), WIDTH, DeckRng::new(42))
        .expect("default settings are valid")
}

/// Word on the front card.
pub fn front_word(session: &Session) -> Option<String> {
    let deck = session.deck();
    deck.word(deck.front()).map(|w| w.to_string())
}

/// Tap the front card at `now_ms` and let the flip finish. Returns the time
/// at which the card is revealed.
pub fn reveal_front(session: &mut Session, now_ms: u64) -> u64 {
    assert!(session.tap(now_ms), "front card should accept a tap");
    let revealed_at = now_ms + session.settings().flip_duration_ms;
    session.advance(revealed_at);
    revealed_at
}
