//! Two-slot deck buffer.
//!
//! The deck keeps a front card and a back card. After every resolved swipe
//! the back card is promoted to the front and the slot that just went to the
//! back is refilled with a random word distinct from the new front word.

use crate::rng::DeckRng;
use crate::types::{SlotKind, StudySet, WordId};
use serde::Serialize;

/// One buffer position: an optional word and its z-order (1 = front).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSlot {
    pub word: Option<WordId>,
    pub z_index: u8,
}

/// Number of decorative cards stacked behind the active ones.
pub fn placeholder_count(remaining: usize) -> usize {
    match remaining {
        0..=2 => 0,
        3 => 1,
        _ => 2,
    }
}

/// Rotating current/next buffer.
#[derive(Debug, Clone)]
pub struct DeckController {
    slots: [DeckSlot; 2],
    rng: DeckRng,
}

impl DeckController {
    pub fn new(rng: DeckRng) -> Self {
        Self {
            slots: [
                DeckSlot {
                    word: None,
                    z_index: 1,
                },
                DeckSlot {
                    word: None,
                    z_index: 0,
                },
            ],
            rng,
        }
    }

    /// Seed current and next from the first two entries of `set`.
    pub fn initialize(&mut self, set: &StudySet) {
        self.slots[SlotKind::Current.index()] = DeckSlot {
            word: set.get(0).map(|e| e.word.clone()),
            z_index: 1,
        };
        self.slots[SlotKind::Next.index()] = DeckSlot {
            word: set.get(1).map(|e| e.word.clone()),
            z_index: 0,
        };
        tracing::debug!(
            current = ?self.word(SlotKind::Current),
            next = ?self.word(SlotKind::Next),
            remaining = set.len(),
            "deck initialized"
        );
    }

    pub fn slot(&self, kind: SlotKind) -> &DeckSlot {
        &self.slots[kind.index()]
    }

    pub fn word(&self, kind: SlotKind) -> Option<&WordId> {
        self.slot(kind).word.as_ref()
    }

    /// Slot currently holding z-order 1.
    pub fn front(&self) -> SlotKind {
        if self.slot(SlotKind::Current).z_index > self.slot(SlotKind::Next).z_index {
            SlotKind::Current
        } else {
            SlotKind::Next
        }
    }

    pub fn back(&self) -> SlotKind {
        self.front().other()
    }

    /// No word left in either slot.
    pub fn is_finished(&self) -> bool {
        self.slots.iter().all(|s| s.word.is_none())
    }

    /// Rotate after a resolved swipe and refill the slot that went to the
    /// back. `set` is the study set as it stands after the decision took
    /// effect. Returns whether the z-order was swapped.
    ///
    /// A back word that already left `set` is re-rolled before rotating.
    /// With no back card to promote the front card is recycled in place.
    pub fn on_commit(&mut self, set: &StudySet) -> bool {
        self.replace_stale_back(set);
        let rotated = self.word(self.back()).is_some();
        if rotated {
            self.swap_z();
        }

        self.ensure_front(set);
        self.refill_back(set, rotated);

        tracing::debug!(
            rotated,
            front = ?self.word(self.front()),
            back = ?self.word(self.back()),
            remaining = set.len(),
            "deck rotated"
        );
        rotated
    }

    /// Reconcile both slots against a study set that changed outside a
    /// commit. Valid words are kept.
    pub fn sync(&mut self, set: &StudySet) {
        self.ensure_front(set);
        self.refill_back(set, false);
    }

    fn ensure_front(&mut self, set: &StudySet) {
        let front = self.front();
        if self.word(front).is_some_and(|w| set.contains(w)) {
            return;
        }

        if self.word(front.other()).is_some_and(|w| set.contains(w)) {
            tracing::debug!(replaced = ?self.word(front), "front word left the study set, promoting back card");
            self.swap_z();
            return;
        }

        let picked = self.rng.pick_excluding(set, None).map(|e| e.word.clone());
        tracing::debug!(replaced = ?self.word(front), with = ?picked, "front word left the study set");
        self.slots[front.index()].word = picked;
    }

    fn replace_stale_back(&mut self, set: &StudySet) {
        let back = self.back();
        match self.word(back) {
            Some(word) if !set.contains(word) => {}
            _ => return,
        }
        let front_word = self.word(back.other()).cloned();
        let picked = self.rng.pick_excluding(set, front_word.as_ref()).map(|e| e.word.clone());
        tracing::debug!(replaced = ?self.word(back), with = ?picked, "back word left the study set");
        self.slots[back.index()].word = picked;
    }

    fn swap_z(&mut self) {
        let [current, next] = &mut self.slots;
        std::mem::swap(&mut current.z_index, &mut next.z_index);
    }

    fn refill_back(&mut self, set: &StudySet, force: bool) {
        let back = self.back();
        if set.len() < 2 {
            self.slots[back.index()].word = None;
            return;
        }

        let front_word = self.word(back.other()).cloned();
        let stale = match self.word(back) {
            None => true,
            Some(word) => !set.contains(word) || Some(word) == front_word.as_ref(),
        };
        if !(force || stale) {
            return;
        }

        self.slots[back.index()].word = self
            .rng
            .pick_excluding(set, front_word.as_ref())
            .map(|e| e.word.clone());
    }
}
