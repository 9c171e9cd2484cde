//! Core types for the word deck.

use crate::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifying text of a word, unique within a study set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// A word pending study, as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: WordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default)]
    pub learned: bool,
}

impl WordEntry {
    /// Create an entry carrying only its text.
    pub fn bare(word: impl Into<String>) -> Self {
        Self {
            word: WordId::new(word),
            phonetics: None,
            meaning: None,
            image: None,
            audio: None,
            learned: false,
        }
    }

    /// Display fields of this entry.
    pub fn detail(&self) -> WordDetail {
        WordDetail {
            phonetics: self.phonetics.clone(),
            meaning: self.meaning.clone(),
            image_ref: self.image.clone(),
            audio_ref: self.audio.clone(),
        }
    }
}

/// Detail record looked up when a card is revealed. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
}

/// Words still to be studied, unique by identifier.
///
/// Order only matters for seeding the deck: the first two entries become the
/// initial current and next words.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudySet {
    entries: Vec<WordEntry>,
}

impl StudySet {
    /// Build a study set, rejecting empty or duplicated identifiers.
    pub fn new(entries: Vec<WordEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.word.as_str().trim().is_empty() {
                return Err(DeckError::EmptyWord { index });
            }
            if !seen.insert(entry.word.as_str()) {
                return Err(DeckError::DuplicateWord {
                    word: entry.word.to_string(),
                    index,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Build a study set from every entry not yet marked learned.
    pub fn unlearned(entries: &[WordEntry]) -> Result<Self> {
        Self::new(entries.iter().filter(|e| !e.learned).cloned().collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, word: &WordId) -> Option<&WordEntry> {
        self.entries.iter().find(|e| &e.word == word)
    }

    pub fn contains(&self, word: &WordId) -> bool {
        self.find(word).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }
}

/// Outcome of a committed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Swiped right: the word is known and gets marked learned.
    Remember,
    /// Swiped left: the word stays in the study set.
    DoNotRemember,
}

impl Decision {
    /// Direction of a release-time horizontal translation.
    pub fn from_translation(translate_x: f32) -> Self {
        if translate_x < 0.0 {
            Self::DoNotRemember
        } else {
            Self::Remember
        }
    }
}

/// Per-card swipe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOutcome {
    #[default]
    None,
    CommitLeft,
    CommitRight,
}

impl From<Decision> for CardOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Remember => Self::CommitRight,
            Decision::DoNotRemember => Self::CommitLeft,
        }
    }
}

/// One of the two buffer positions of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Current,
    Next,
}

impl SlotKind {
    pub const ALL: [SlotKind; 2] = [SlotKind::Current, SlotKind::Next];

    pub fn index(self) -> usize {
        match self {
            Self::Current => 0,
            Self::Next => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Current => Self::Next,
            Self::Next => Self::Current,
        }
    }
}

/// Timing and threshold configuration of the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckSettings {
    /// Duration of the face-down to face-up flip.
    pub flip_duration_ms: u64,
    /// Delay after a tap before detail content becomes visible.
    pub reveal_delay_ms: u64,
    /// Duration of the fly-off animation after a commit.
    pub fly_off_ms: u64,
    /// Duration of the return to rest after a "do not remember" fly-off.
    pub snap_back_ms: u64,
    /// Duration of the spring back to rest after a cancelled swipe.
    pub spring_ms: u64,
    /// Time a remembered card stays off-screen before resetting.
    pub remember_hold_ms: u64,
    /// Swipe threshold is `viewport_width / swipe_divisor`.
    pub swipe_divisor: f32,
    /// Card tilt in degrees is `-translate_x / tilt_divisor`.
    pub tilt_divisor: f32,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            flip_duration_ms: 1500,
            reveal_delay_ms: 750,
            fly_off_ms: 300,
            snap_back_ms: 300,
            spring_ms: 400,
            remember_hold_ms: 1000,
            swipe_divisor: 2.3,
            tilt_divisor: 15.0,
        }
    }
}

impl DeckSettings {
    /// Check that the settings describe a usable deck.
    pub fn validate(&self) -> Result<()> {
        if !(self.swipe_divisor.is_finite() && self.swipe_divisor > 0.0) {
            return Err(DeckError::InvalidSetting {
                name: "swipe_divisor",
                reason: format!("must be a positive number, got {}", self.swipe_divisor),
            });
        }
        if !(self.tilt_divisor.is_finite() && self.tilt_divisor > 0.0) {
            return Err(DeckError::InvalidSetting {
                name: "tilt_divisor",
                reason: format!("must be a positive number, got {}", self.tilt_divisor),
            });
        }
        if self.reveal_delay_ms > self.flip_duration_ms {
            return Err(DeckError::InvalidSetting {
                name: "reveal_delay_ms",
                reason: format!(
                    "{} exceeds flip_duration_ms {}",
                    self.reveal_delay_ms, self.flip_duration_ms
                ),
            });
        }
        Ok(())
    }

    /// Horizontal distance a release must reach to commit.
    pub fn swipe_threshold(&self, viewport_width: f32) -> f32 {
        viewport_width / self.swipe_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_set_rejects_duplicates() {
        let result = StudySet::new(vec![
            WordEntry::bare("apple"),
            WordEntry::bare("pear"),
            WordEntry::bare("apple"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DeckError::DuplicateWord {
                word: "apple".to_string(),
                index: 2
            }
        );
    }

    #[test]
    fn study_set_rejects_blank_word() {
        let result = StudySet::new(vec![WordEntry::bare("apple"), WordEntry::bare("  ")]);
        assert_eq!(result.unwrap_err(), DeckError::EmptyWord { index: 1 });
    }

    #[test]
    fn unlearned_skips_learned_entries() {
        let mut known = WordEntry::bare("known");
        known.learned = true;
        let set = StudySet::unlearned(&[known, WordEntry::bare("fresh")]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&WordId::from("fresh")));
        assert!(!set.contains(&WordId::from("known")));
    }

    #[test]
    fn decision_follows_translation_sign() {
        assert_eq!(Decision::from_translation(-0.5), Decision::DoNotRemember);
        assert_eq!(Decision::from_translation(300.0), Decision::Remember);
        assert_eq!(CardOutcome::from(Decision::DoNotRemember), CardOutcome::CommitLeft);
        assert_eq!(CardOutcome::from(Decision::Remember), CardOutcome::CommitRight);
    }

    #[test]
    fn default_threshold_for_600_wide_viewport() {
        let settings = DeckSettings::default();
        let threshold = settings.swipe_threshold(600.0);
        assert!((threshold - 260.869).abs() < 0.01);
    }

    #[test]
    fn validate_rejects_zero_divisor() {
        let settings = DeckSettings {
            swipe_divisor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(DeckError::InvalidSetting { name: "swipe_divisor", .. })
        ));
    }

    #[test]
    fn validate_rejects_late_reveal() {
        let settings = DeckSettings {
            reveal_delay_ms: 2000,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert!(DeckSettings::default().validate().is_ok());
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: DeckSettings = serde_json::from_str(r#"{"remember_hold_ms": 250}"#).unwrap();
        assert_eq!(settings.remember_hold_ms, 250);
        assert_eq!(settings.flip_duration_ms, 1500);
    }

    #[test]
    fn word_entry_deserializes_with_optional_fields() {
        let entry: WordEntry =
            serde_json::from_str(r#"{"word": "cat", "meaning": "a small feline"}"#).unwrap();
        assert_eq!(entry.word.as_str(), "cat");
        assert_eq!(entry.detail().meaning.as_deref(), Some("a small feline"));
        assert!(entry.detail().phonetics.is_none());
        assert!(!entry.learned);
    }
}
