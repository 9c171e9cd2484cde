//! In-memory word store loaded from a JSON word list.

use anyhow::{Context, Result};
use std::path::Path;
use word_deck_core::{LearnedSink, StudySet, WordDetail, WordEntry, WordId, WordSource};

/// Word list held in memory for one session. Learned flags are not written
/// back to disk.
#[derive(Debug, Clone)]
pub struct JsonWordStore {
    entries: Vec<WordEntry>,
}

impl JsonWordStore {
    /// Load a JSON array of word entries.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading word list {}", path.display()))?;
        let entries: Vec<WordEntry> = serde_json::from_str(&content)
            .with_context(|| format!("parsing word list {}", path.display()))?;
        let store = Self::from_entries(entries)?;
        tracing::info!(
            path = %path.display(),
            total = store.entries.len(),
            pending = store.pending_count(),
            "word list loaded"
        );
        Ok(store)
    }

    /// Wrap entries after checking they are unique.
    pub fn from_entries(entries: Vec<WordEntry>) -> word_deck_core::Result<Self> {
        StudySet::new(entries.clone())?;
        Ok(Self { entries })
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.learned).count()
    }

    pub fn learned_count(&self) -> usize {
        self.entries.len() - self.pending_count()
    }
}

impl WordSource for JsonWordStore {
    fn study_set(&self) -> StudySet {
        StudySet::unlearned(&self.entries).unwrap_or_else(|err| {
            tracing::warn!(%err, "word list rejected, studying nothing");
            StudySet::empty()
        })
    }

    fn word_detail(&self, word: &WordId) -> Option<WordDetail> {
        self.entries.iter().find(|e| &e.word == word).map(WordEntry::detail)
    }
}

impl LearnedSink for JsonWordStore {
    fn mark_learned(&mut self, word: &WordId) {
        match self.entries.iter_mut().find(|e| &e.word == word) {
            Some(entry) => {
                entry.learned = true;
                tracing::info!(%word, "marked learned");
            }
            None => tracing::warn!(%word, "cannot mark unknown word learned"),
        }
    }
}
