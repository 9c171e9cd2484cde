//! Render a session into a plain view model.

use crate::deck::placeholder_count;
use crate::gesture::{indicator_opacity, Indicators, HIDDEN_ROTATION};
use crate::ports::{AudioPlayer, LearnedSink, WordSource};
use crate::session::StudySession;
use crate::types::{SlotKind, WordDetail};
use serde::Serialize;

/// Tilt of the decorative cards stacked behind the deck, in degrees.
pub const PLACEHOLDER_TILTS: [f32; 2] = [3.0, -3.0];

/// Everything the host needs to draw the deck at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckView {
    /// Active cards, back to front.
    pub cards: Vec<CardView>,
    pub placeholders: Vec<Placeholder>,
    pub remaining: usize,
    /// No words left; show the completion view instead.
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub slot: SlotKind,
    pub z_index: u8,
    pub word: String,
    pub face_up: bool,
    pub interactive: bool,
    pub transform: CardTransform,
    /// Present once the reveal delay has elapsed and a record was found.
    pub detail: Option<WordDetail>,
    /// Present while the card is face up and its details are showing.
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    /// In-plane tilt, degrees.
    pub rotate_deg: f32,
    /// Flip around the vertical axis, radians. π is face down.
    pub rotate_y_rad: f32,
}

/// Non-interactive card drawn behind the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placeholder {
    pub tilt_deg: f32,
}

/// Build the view model for `session` at `now_ms`.
pub fn render<S, A>(session: &StudySession<S, A>, now_ms: u64) -> DeckView
where
    S: WordSource + LearnedSink,
    A: AudioPlayer,
{
    let deck = session.deck();
    let threshold = session.swipe_threshold();
    let tilt_divisor = session.settings().tilt_divisor;
    let front = deck.front();

    let mut cards: Vec<CardView> = SlotKind::ALL
        .into_iter()
        .filter(|slot| deck.word(*slot).is_some())
        .filter_map(|slot| {
            let card = session.card(slot)?;
            let (translate_x, translate_y) = card.translation(now_ms);
            let rotate_y_rad = card.rotation_y(now_ms);
            let interactive = slot == front && (card.accepts_tap() || card.accepts_drag());

            Some(CardView {
                slot,
                z_index: deck.slot(slot).z_index,
                word: card.word().to_string(),
                face_up: rotate_y_rad < HIDDEN_ROTATION / 2.0,
                interactive,
                transform: CardTransform {
                    translate_x,
                    translate_y,
                    rotate_deg: -translate_x / tilt_divisor,
                    rotate_y_rad,
                },
                detail: card.details_visible().then(|| card.detail().cloned()).flatten(),
                indicators: card
                    .details_visible()
                    .then(|| indicator_opacity(translate_x, threshold)),
            })
        })
        .collect();
    cards.sort_by_key(|c| c.z_index);

    let remaining = session.study_set().len();
    let placeholders = PLACEHOLDER_TILTS
        .iter()
        .take(placeholder_count(remaining))
        .map(|&tilt_deg| Placeholder { tilt_deg })
        .collect();

    DeckView {
        cards,
        placeholders,
        remaining,
        finished: session.is_finished(),
    }
}
