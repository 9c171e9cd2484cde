//! Per-card gesture state machine.
//!
//! A card starts face down. A tap flips it face up; once the flip finishes
//! the card can be dragged. Releasing a drag either springs the card back to
//! rest or commits a decision and flies the card off-screen, after which it
//! returns to rest face down and can be reused.
//!
//! ```text
//! HiddenFace --tap--> Flipping --FlipComplete--> Revealed <--ReturnComplete-- Returning
//!                                                  |  ^                          ^
//!                                          drag    v  | (drag again)             | release < threshold
//!                                               Dragging ------------------------+
//!                                                  | release >= threshold
//!                                                  v
//!                       Dismissing --FlyOffComplete--> Resetting --HoldElapsed/SnapBackComplete--> HiddenFace
//! ```

use crate::animation::{AnimationHandle, Completion, Cue, Curve, Motion, MountId, Timeline};
use crate::types::{CardOutcome, Decision, DeckSettings, WordDetail, WordId};
use serde::Serialize;
use std::f32::consts::PI;

/// Flip rotation of a face-down card, in radians.
pub const HIDDEN_ROTATION: f32 = PI;

/// Discrete phase of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    HiddenFace,
    Flipping,
    Revealed,
    Dragging,
    Returning,
    Dismissing(Decision),
    Resetting(Decision),
}

/// Result of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No drag was in progress.
    Ignored,
    /// Released below the threshold; the card springs back.
    Cancelled,
    /// Released at or past the threshold.
    Committed(Decision),
}

/// Snapshot of a card's transient state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardState {
    pub revealed: bool,
    pub drag_offset: (f32, f32),
    pub outcome: CardOutcome,
}

/// Opacity of the two swipe hints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicators {
    /// "I know it", shown while dragging right.
    pub know_it: f32,
    /// "Learn again", shown while dragging left.
    pub learn_again: f32,
}

/// Hint opacity for a horizontal translation: zero at center, fully opaque
/// at the swipe threshold, clamped beyond it.
pub fn indicator_opacity(translate_x: f32, threshold: f32) -> Indicators {
    if threshold <= 0.0 {
        return Indicators {
            know_it: if translate_x > 0.0 { 1.0 } else { 0.0 },
            learn_again: if translate_x < 0.0 { 1.0 } else { 0.0 },
        };
    }
    Indicators {
        know_it: (translate_x / threshold).clamp(0.0, 1.0),
        learn_again: (-translate_x / threshold).clamp(0.0, 1.0),
    }
}

/// Gesture and reveal state of one mounted card.
#[derive(Debug)]
pub struct CardGestureMachine {
    mount: MountId,
    word: WordId,
    settings: DeckSettings,
    phase: CardPhase,
    details_visible: bool,
    detail: Option<WordDetail>,
    outcome: CardOutcome,
    translate_x: Motion,
    translate_y: Motion,
    rotate_y: Motion,
    pending: Vec<AnimationHandle>,
}

impl CardGestureMachine {
    /// Mount a face-down card for `word`.
    pub fn new(word: WordId, settings: &DeckSettings, timeline: &mut Timeline) -> Self {
        Self {
            mount: timeline.mount(),
            word,
            settings: settings.clone(),
            phase: CardPhase::HiddenFace,
            details_visible: false,
            detail: None,
            outcome: CardOutcome::None,
            translate_x: Motion::at_rest(0.0),
            translate_y: Motion::at_rest(0.0),
            rotate_y: Motion::at_rest(HIDDEN_ROTATION),
            pending: Vec::new(),
        }
    }

    pub fn mount(&self) -> MountId {
        self.mount
    }

    pub fn word(&self) -> &WordId {
        &self.word
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn details_visible(&self) -> bool {
        self.details_visible
    }

    pub fn detail(&self) -> Option<&WordDetail> {
        self.detail.as_ref()
    }

    pub fn accepts_tap(&self) -> bool {
        self.phase == CardPhase::HiddenFace
    }

    pub fn accepts_drag(&self) -> bool {
        matches!(
            self.phase,
            CardPhase::Revealed | CardPhase::Dragging | CardPhase::Returning
        )
    }

    pub fn is_revealed(&self) -> bool {
        self.accepts_drag()
    }

    /// Committed and still playing its exit; must not be replaced yet.
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, CardPhase::Dismissing(_) | CardPhase::Resetting(_))
    }

    /// Face down, at rest, nothing pending.
    pub fn is_settled(&self, now_ms: u64) -> bool {
        self.phase == CardPhase::HiddenFace
            && self.pending.is_empty()
            && self.translate_x.is_settled(now_ms)
            && self.translate_y.is_settled(now_ms)
    }

    pub fn translation(&self, now_ms: u64) -> (f32, f32) {
        (self.translate_x.value_at(now_ms), self.translate_y.value_at(now_ms))
    }

    pub fn rotation_y(&self, now_ms: u64) -> f32 {
        self.rotate_y.value_at(now_ms)
    }

    pub fn state(&self, now_ms: u64) -> CardState {
        CardState {
            revealed: self.is_revealed(),
            drag_offset: self.translation(now_ms),
            outcome: self.outcome,
        }
    }

    /// Store the detail record fetched for this card's word.
    pub fn cache_detail(&mut self, detail: Option<WordDetail>) {
        self.detail = detail;
    }

    /// Start the flip. Returns false if the card is not face down.
    pub fn tap(&mut self, now_ms: u64, timeline: &mut Timeline) -> bool {
        if !self.accepts_tap() {
            return false;
        }

        self.phase = CardPhase::Flipping;
        self.outcome = CardOutcome::None;
        self.rotate_y = Motion::tween(
            HIDDEN_ROTATION,
            0.0,
            now_ms,
            self.settings.flip_duration_ms,
            Curve::EaseOut,
        );
        self.schedule(timeline, Cue::DetailsVisible, now_ms, self.settings.reveal_delay_ms);
        self.schedule(timeline, Cue::FlipComplete, now_ms, self.settings.flip_duration_ms);
        true
    }

    /// Track the cumulative translation of an active drag.
    pub fn drag_update(&mut self, dx: f32, dy: f32, timeline: &mut Timeline) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            tracing::warn!(word = %self.word, dx, dy, "non-finite drag offset ignored");
            return false;
        }
        match self.phase {
            CardPhase::Revealed | CardPhase::Dragging => {}
            CardPhase::Returning => {
                // Grabbed mid-spring: the return will never complete.
                for handle in self.pending.drain(..) {
                    timeline.cancel(handle);
                }
            }
            _ => return false,
        }

        self.phase = CardPhase::Dragging;
        self.translate_x = Motion::at_rest(dx);
        self.translate_y = Motion::at_rest(dy);
        true
    }

    /// End the drag, deciding from the translation at this instant only.
    pub fn drag_end(&mut self, now_ms: u64, threshold: f32, timeline: &mut Timeline) -> ReleaseOutcome {
        if self.phase != CardPhase::Dragging {
            return ReleaseOutcome::Ignored;
        }

        let (tx, _) = self.translation(now_ms);
        if !tx.is_finite() || tx.abs() < threshold {
            let spring = self.settings.spring_ms;
            self.translate_x = self.translate_x.retarget(0.0, now_ms, spring, Curve::Spring);
            self.translate_y = self.translate_y.retarget(0.0, now_ms, spring, Curve::Spring);
            self.phase = CardPhase::Returning;
            self.schedule(timeline, Cue::ReturnComplete, now_ms, spring);
            return ReleaseOutcome::Cancelled;
        }

        let decision = Decision::from_translation(tx);
        tracing::debug!(word = %self.word, ?decision, tx, threshold, "swipe committed");

        self.phase = CardPhase::Dismissing(decision);
        self.outcome = decision.into();
        self.details_visible = false;
        self.translate_x = Motion::tween(tx, tx * 2.0, now_ms, self.settings.fly_off_ms, Curve::EaseOut);
        self.schedule(timeline, Cue::FlyOffComplete, now_ms, self.settings.fly_off_ms);
        ReleaseOutcome::Committed(decision)
    }

    /// Apply a timeline completion. Follow-up animations start at the time the
    /// cue was due. Returns false when it does not belong to this mount or is
    /// no longer awaited.
    pub fn on_complete(&mut self, completion: Completion, timeline: &mut Timeline) -> bool {
        let now_ms = completion.due_ms;
        if completion.handle.mount() != self.mount {
            tracing::trace!(word = %self.word, cue = ?completion.cue, "completion for another mount dropped");
            return false;
        }
        let Some(index) = self.pending.iter().position(|h| *h == completion.handle) else {
            tracing::trace!(word = %self.word, cue = ?completion.cue, "stale completion dropped");
            return false;
        };
        self.pending.swap_remove(index);

        match (self.phase, completion.cue) {
            (CardPhase::Flipping, Cue::DetailsVisible) => {
                self.details_visible = true;
            }
            (CardPhase::Flipping, Cue::FlipComplete) => {
                self.phase = CardPhase::Revealed;
            }
            (CardPhase::Returning, Cue::ReturnComplete) => {
                self.phase = CardPhase::Revealed;
            }
            (CardPhase::Dismissing(decision), Cue::FlyOffComplete) => {
                self.rotate_y = Motion::at_rest(HIDDEN_ROTATION);
                self.phase = CardPhase::Resetting(decision);
                match decision {
                    Decision::Remember => {
                        self.schedule(timeline, Cue::HoldElapsed, now_ms, self.settings.remember_hold_ms);
                    }
                    Decision::DoNotRemember => {
                        let duration = self.settings.snap_back_ms;
                        self.translate_x = self.translate_x.retarget(0.0, now_ms, duration, Curve::EaseOut);
                        self.translate_y = self.translate_y.retarget(0.0, now_ms, duration, Curve::EaseOut);
                        self.schedule(timeline, Cue::SnapBackComplete, now_ms, duration);
                    }
                }
            }
            (CardPhase::Resetting(_), Cue::HoldElapsed | Cue::SnapBackComplete) => {
                self.translate_x = Motion::at_rest(0.0);
                self.translate_y = Motion::at_rest(0.0);
                self.phase = CardPhase::HiddenFace;
                self.outcome = CardOutcome::None;
                self.details_visible = false;
            }
            (phase, cue) => {
                tracing::trace!(word = %self.word, ?phase, ?cue, "completion ignored in this phase");
                return false;
            }
        }
        true
    }

    /// Unmount the card, cancelling everything it scheduled.
    pub fn teardown(self, timeline: &mut Timeline) {
        let dropped = timeline.cancel_mount(self.mount);
        if dropped > 0 {
            tracing::debug!(word = %self.word, dropped, "card unmounted with pending animations");
        }
    }

    fn schedule(&mut self, timeline: &mut Timeline, cue: Cue, now_ms: u64, delay_ms: u64) {
        let handle = timeline.schedule(self.mount, cue, now_ms, delay_ms);
        self.pending.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: f32 = 600.0;

    fn threshold() -> f32 {
        DeckSettings::default().swipe_threshold(WIDTH)
    }

    fn card(timeline: &mut Timeline) -> CardGestureMachine {
        CardGestureMachine::new(WordId::from("apple"), &DeckSettings::default(), timeline)
    }

    fn run_until(card: &mut CardGestureMachine, timeline: &mut Timeline, now_ms: u64) {
        loop {
            let due = timeline.drain_due(now_ms);
            if due.is_empty() {
                break;
            }
            for completion in due {
                card.on_complete(completion, timeline);
            }
        }
    }

    fn revealed(timeline: &mut Timeline) -> CardGestureMachine {
        let mut card = card(timeline);
        assert!(card.tap(0, timeline));
        run_until(&mut card, timeline, 1500);
        assert_eq!(card.phase(), CardPhase::Revealed);
        card
    }

    #[test]
    fn tap_flips_then_reveals() {
        let mut timeline = Timeline::new();
        let mut card = card(&mut timeline);

        assert!(card.tap(0, &mut timeline));
        assert_eq!(card.phase(), CardPhase::Flipping);
        assert!(!card.tap(10, &mut timeline));

        run_until(&mut card, &mut timeline, 749);
        assert!(!card.details_visible());

        run_until(&mut card, &mut timeline, 750);
        assert!(card.details_visible());
        assert_eq!(card.phase(), CardPhase::Flipping);

        run_until(&mut card, &mut timeline, 1499);
        assert_eq!(card.phase(), CardPhase::Flipping);

        run_until(&mut card, &mut timeline, 1500);
        assert_eq!(card.phase(), CardPhase::Revealed);
        assert_eq!(card.rotation_y(1500), 0.0);
    }

    #[test]
    fn drag_rejected_while_face_down() {
        let mut timeline = Timeline::new();
        let mut card = card(&mut timeline);

        assert!(!card.drag_update(400.0, 0.0, &mut timeline));
        assert_eq!(card.drag_end(0, threshold(), &mut timeline), ReleaseOutcome::Ignored);

        card.tap(0, &mut timeline);
        assert!(!card.drag_update(400.0, 0.0, &mut timeline));
    }

    #[test]
    fn release_below_threshold_springs_back() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        assert!(card.drag_update(-250.0, 12.0, &mut timeline));
        assert_eq!(card.drag_end(2000, threshold(), &mut timeline), ReleaseOutcome::Cancelled);
        assert_eq!(card.phase(), CardPhase::Returning);
        assert!(card.is_revealed());

        run_until(&mut card, &mut timeline, 2400);
        assert_eq!(card.phase(), CardPhase::Revealed);
        assert_eq!(card.translation(2400), (0.0, 0.0));
        assert_eq!(card.state(2400).outcome, CardOutcome::None);
    }

    #[test]
    fn release_past_threshold_commits_left() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        card.drag_update(-300.0, 0.0, &mut timeline);
        assert_eq!(
            card.drag_end(2000, threshold(), &mut timeline),
            ReleaseOutcome::Committed(Decision::DoNotRemember)
        );
        assert_eq!(card.state(2000).outcome, CardOutcome::CommitLeft);
        assert!(!card.accepts_drag());
        assert!(!card.drag_update(10.0, 0.0, &mut timeline));

        run_until(&mut card, &mut timeline, 2300);
        assert_eq!(card.translation(2300).0, -600.0);
        assert_eq!(card.rotation_y(2300), HIDDEN_ROTATION);
        assert_eq!(card.phase(), CardPhase::Resetting(Decision::DoNotRemember));

        run_until(&mut card, &mut timeline, 2600);
        assert_eq!(card.phase(), CardPhase::HiddenFace);
        assert!(card.is_settled(2600));
    }

    #[test]
    fn remember_holds_off_screen_before_reset() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        card.drag_update(320.0, 0.0, &mut timeline);
        assert_eq!(
            card.drag_end(2000, threshold(), &mut timeline),
            ReleaseOutcome::Committed(Decision::Remember)
        );

        run_until(&mut card, &mut timeline, 2300);
        assert_eq!(card.translation(2300).0, 640.0);

        run_until(&mut card, &mut timeline, 3299);
        assert_eq!(card.translation(3299).0, 640.0);
        assert_eq!(card.phase(), CardPhase::Resetting(Decision::Remember));

        run_until(&mut card, &mut timeline, 3300);
        assert_eq!(card.translation(3300), (0.0, 0.0));
        assert_eq!(card.rotation_y(3300), HIDDEN_ROTATION);
        assert_eq!(card.phase(), CardPhase::HiddenFace);
        assert!(card.accepts_tap());
    }

    #[test]
    fn decision_uses_release_time_translation() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        card.drag_update(-500.0, 0.0, &mut timeline);
        card.drag_update(-2.0, 1.0, &mut timeline);
        assert_eq!(card.drag_end(2000, threshold(), &mut timeline), ReleaseOutcome::Cancelled);
    }

    #[test]
    fn non_finite_offsets_are_ignored() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        assert!(!card.drag_update(f32::NAN, 0.0, &mut timeline));
        assert!(!card.drag_update(0.0, f32::INFINITY, &mut timeline));
        assert_eq!(card.phase(), CardPhase::Revealed);
        assert_eq!(card.drag_end(2000, threshold(), &mut timeline), ReleaseOutcome::Ignored);

        card.drag_update(40.0, 0.0, &mut timeline);
        assert!(!card.drag_update(f32::NEG_INFINITY, 0.0, &mut timeline));
        assert_eq!(card.translation(2000), (40.0, 0.0));
        assert_eq!(card.drag_end(2000, threshold(), &mut timeline), ReleaseOutcome::Cancelled);
        assert_eq!(card.state(2000).outcome, CardOutcome::None);
    }

    #[test]
    fn exact_threshold_commits() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        card.drag_update(threshold(), 0.0, &mut timeline);
        assert_eq!(
            card.drag_end(2000, threshold(), &mut timeline),
            ReleaseOutcome::Committed(Decision::Remember)
        );
    }

    #[test]
    fn grabbing_during_spring_cancels_return() {
        let mut timeline = Timeline::new();
        let mut card = revealed(&mut timeline);

        card.drag_update(100.0, 0.0, &mut timeline);
        card.drag_end(2000, threshold(), &mut timeline);
        assert!(card.drag_update(50.0, 0.0, &mut timeline));
        assert_eq!(card.phase(), CardPhase::Dragging);

        run_until(&mut card, &mut timeline, 5000);
        assert_eq!(card.phase(), CardPhase::Dragging);
        assert_eq!(card.translation(5000), (50.0, 0.0));
    }

    #[test]
    fn completion_for_other_mount_is_noop() {
        let mut timeline = Timeline::new();
        let mut first = card(&mut timeline);
        let mut second = card(&mut timeline);
        first.tap(0, &mut timeline);

        for completion in timeline.drain_due(1500) {
            assert!(!second.on_complete(completion, &mut timeline));
        }
        assert_eq!(second.phase(), CardPhase::HiddenFace);
        assert_eq!(first.phase(), CardPhase::Flipping);
    }

    #[test]
    fn teardown_cancels_pending_timers() {
        let mut timeline = Timeline::new();
        let mut card = card(&mut timeline);
        card.tap(0, &mut timeline);
        assert_eq!(timeline.len(), 2);

        card.teardown(&mut timeline);
        assert!(timeline.is_empty());
    }

    #[test]
    fn indicators_scale_with_translation() {
        let t = threshold();
        assert_eq!(indicator_opacity(0.0, t), Indicators { know_it: 0.0, learn_again: 0.0 });
        assert_eq!(indicator_opacity(t, t).know_it, 1.0);
        assert_eq!(indicator_opacity(t * 3.0, t).know_it, 1.0);
        assert_eq!(indicator_opacity(-t, t).learn_again, 1.0);
        assert_eq!(indicator_opacity(-t, t).know_it, 0.0);

        let half = indicator_opacity(t / 2.0, t);
        assert!((half.know_it - 0.5).abs() < 1e-6);
        assert_eq!(half.learn_again, 0.0);
    }

    proptest! {
        #[test]
        fn indicator_opacity_is_monotone_and_clamped(a in -2000.0f32..2000.0, b in -2000.0f32..2000.0) {
            let t = threshold();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo, hi) = (indicator_opacity(lo, t), indicator_opacity(hi, t));

            prop_assert!(lo.know_it <= hi.know_it);
            prop_assert!(lo.learn_again >= hi.learn_again);
            for value in [lo.know_it, lo.learn_again, hi.know_it, hi.learn_again] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
            prop_assert!(hi.know_it == 0.0 || hi.learn_again == 0.0);
        }
    }
}
