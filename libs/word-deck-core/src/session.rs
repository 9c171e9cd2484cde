//! Study session: the deck, its cards and their collaborators.
//!
//! The session is driven entirely by the host: input events and `advance`
//! calls carry a monotonic `now_ms`, and nothing happens between calls.
//! Only the front card receives gestures.

use crate::animation::Timeline;
use crate::deck::DeckController;
use crate::error::{DeckError, Result};
use crate::gesture::{CardGestureMachine, ReleaseOutcome};
use crate::ports::{AudioPlayer, LearnedSink, WordSource};
use crate::rng::DeckRng;
use crate::types::{Decision, DeckSettings, SlotKind, StudySet};
use serde::Serialize;

/// Decision counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub remembered: u32,
    pub not_remembered: u32,
    pub cancelled: u32,
}

impl SessionStats {
    pub fn total_commits(&self) -> u32 {
        self.remembered + self.not_remembered
    }

    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Remember => self.remembered += 1,
            Decision::DoNotRemember => self.not_remembered += 1,
        }
    }
}

/// A running study deck wired to its collaborators.
pub struct StudySession<S, A> {
    store: S,
    audio: A,
    settings: DeckSettings,
    viewport_width: f32,
    study_set: StudySet,
    deck: DeckController,
    cards: [Option<CardGestureMachine>; 2],
    timeline: Timeline,
    stats: SessionStats,
}

impl<S, A> StudySession<S, A>
where
    S: WordSource + LearnedSink,
    A: AudioPlayer,
{
    /// Read the study set from `store` and deal the first two cards.
    pub fn new(store: S, audio: A, settings: DeckSettings, viewport_width: f32, rng: DeckRng) -> Result<Self> {
        settings.validate()?;
        check_viewport(viewport_width)?;

        let study_set = store.study_set();
        let mut deck = DeckController::new(rng);
        deck.initialize(&study_set);

        let mut session = Self {
            store,
            audio,
            settings,
            viewport_width,
            study_set,
            deck,
            cards: [None, None],
            timeline: Timeline::new(),
            stats: SessionStats::default(),
        };
        session.sync_cards();
        Ok(session)
    }

    pub fn settings(&self) -> &DeckSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for hosts that change the store outside the deck.
    /// Call [`StudySession::refresh`] afterwards.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn deck(&self) -> &DeckController {
        &self.deck
    }

    pub fn study_set(&self) -> &StudySet {
        &self.study_set
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn card(&self, slot: SlotKind) -> Option<&CardGestureMachine> {
        self.cards[slot.index()].as_ref()
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Release distance needed to commit a swipe.
    pub fn swipe_threshold(&self) -> f32 {
        self.settings.swipe_threshold(self.viewport_width)
    }

    pub fn set_viewport_width(&mut self, width: f32) -> Result<()> {
        check_viewport(width)?;
        self.viewport_width = width;
        Ok(())
    }

    /// No words left: the host should show its completion view.
    pub fn is_finished(&self) -> bool {
        self.deck.is_finished()
    }

    /// Earliest time at which `advance` has work to do.
    pub fn next_wakeup(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    /// Deliver every animation completion due by `now_ms`. Returns how many
    /// were applied to a live card.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        let mut applied = 0;
        loop {
            let due = self.timeline.drain_due(now_ms);
            if due.is_empty() {
                break;
            }
            for completion in due {
                let mount = completion.handle.mount();
                let card = self.cards.iter_mut().flatten().find(|c| c.mount() == mount);
                match card {
                    Some(card) => {
                        if card.on_complete(completion, &mut self.timeline) {
                            applied += 1;
                        }
                    }
                    None => tracing::trace!(cue = ?completion.cue, "completion for unmounted card dropped"),
                }
            }
        }
        self.sync_cards();
        applied
    }

    /// Tap the front card. Starts the flip and fetches the word's details.
    pub fn tap(&mut self, now_ms: u64) -> bool {
        self.advance(now_ms);
        let front = self.deck.front();
        let Some(card) = self.cards[front.index()].as_mut() else {
            return false;
        };
        if !card.tap(now_ms, &mut self.timeline) {
            return false;
        }

        let detail = self.store.word_detail(card.word());
        if detail.is_none() {
            tracing::debug!(word = %card.word(), "no detail record, showing bare word");
        }
        card.cache_detail(detail);
        true
    }

    /// Cumulative drag translation of the front card.
    pub fn drag_update(&mut self, dx: f32, dy: f32, now_ms: u64) -> bool {
        self.advance(now_ms);
        let timeline = &mut self.timeline;
        let front = self.deck.front();
        match self.cards[front.index()].as_mut() {
            Some(card) => card.drag_update(dx, dy, timeline),
            None => false,
        }
    }

    /// Release the front card. A commit is routed to the collaborators and
    /// rotates the deck before this returns.
    pub fn drag_end(&mut self, now_ms: u64) -> ReleaseOutcome {
        self.advance(now_ms);
        let threshold = self.swipe_threshold();
        let front = self.deck.front();
        let Some(card) = self.cards[front.index()].as_mut() else {
            return ReleaseOutcome::Ignored;
        };

        let outcome = card.drag_end(now_ms, threshold, &mut self.timeline);
        match outcome {
            ReleaseOutcome::Committed(decision) => {
                let word = card.word().clone();
                self.stats.record(decision);
                if decision == Decision::Remember {
                    self.store.mark_learned(&word);
                }
                self.study_set = self.store.study_set();
                self.deck.on_commit(&self.study_set);
                self.sync_cards();
                if self.is_finished() {
                    tracing::info!(
                        remembered = self.stats.remembered,
                        not_remembered = self.stats.not_remembered,
                        "study set exhausted"
                    );
                }
            }
            ReleaseOutcome::Cancelled => self.stats.cancelled += 1,
            ReleaseOutcome::Ignored => {}
        }
        outcome
    }

    /// Play the front card's pronunciation if its details are showing.
    pub fn play_audio(&mut self, now_ms: u64) -> bool {
        self.advance(now_ms);
        let front = self.deck.front();
        let audio_ref = self.cards[front.index()]
            .as_ref()
            .filter(|card| card.details_visible())
            .and_then(|card| card.detail())
            .and_then(|detail| detail.audio_ref.clone());

        match audio_ref {
            Some(audio_ref) => {
                self.audio.play(&audio_ref);
                true
            }
            None => false,
        }
    }

    /// Re-read the study set after an outside change and reconcile the deck.
    pub fn refresh(&mut self, now_ms: u64) {
        self.advance(now_ms);
        self.study_set = self.store.study_set();
        self.deck.sync(&self.study_set);
        self.sync_cards();
    }

    /// Remount cards whose slot word changed. A committed card keeps its old
    /// word until its exit animation has played out; any other card is torn
    /// down at once and its pending timers cancelled.
    fn sync_cards(&mut self) {
        for slot in SlotKind::ALL {
            let desired = self.deck.word(slot).cloned();
            let entry = &mut self.cards[slot.index()];

            let replace = match entry {
                None => desired.is_some(),
                Some(card) => Some(card.word()) != desired.as_ref() && !card.is_exiting(),
            };
            if !replace {
                continue;
            }

            if let Some(old) = entry.take() {
                tracing::debug!(?slot, word = %old.word(), "card unmounted");
                old.teardown(&mut self.timeline);
            }
            if let Some(word) = desired {
                tracing::debug!(?slot, %word, "card mounted");
                *entry = Some(CardGestureMachine::new(word, &self.settings, &mut self.timeline));
            }
        }
    }
}

fn check_viewport(width: f32) -> Result<()> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(DeckError::InvalidSetting {
            name: "viewport_width",
            reason: format!("must be a positive number, got {width}"),
        })
    }
}
