//! Plain-text rendering of the deck view.

use word_deck_core::{CardView, DeckView, SessionStats};

pub const COMPLETION_MESSAGE: &str = "Congrats! For now you have learnt all the words";

/// Describe the deck, back card first.
pub fn describe(view: &DeckView) -> String {
    if view.finished {
        return COMPLETION_MESSAGE.to_string();
    }

    let mut out = format!("{} words remaining", view.remaining);
    if !view.placeholders.is_empty() {
        out.push_str(&format!(", {} more stacked behind", view.placeholders.len()));
    }
    for card in &view.cards {
        out.push('\n');
        out.push_str(&describe_card(card));
    }
    out
}

fn describe_card(card: &CardView) -> String {
    let marker = if card.interactive { '>' } else { ' ' };
    let face = if card.face_up { "face up" } else { "face down" };
    let mut out = format!("{marker} [{:?}] {} ({face})", card.slot, card.word);

    let t = &card.transform;
    if t.translate_x != 0.0 || t.translate_y != 0.0 {
        out.push_str(&format!(
            " offset {:+.0},{:+.0} tilt {:+.1}°",
            t.translate_x, t.translate_y, t.rotate_deg
        ));
    }

    if let Some(detail) = &card.detail {
        let fields: Vec<String> = [
            detail.phonetics.clone(),
            detail.meaning.clone(),
            detail.image_ref.as_ref().map(|i| format!("image {i}")),
            detail.audio_ref.as_ref().map(|_| "audio available".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !fields.is_empty() {
            out.push_str(&format!("\n      {}", fields.join(" | ")));
        }
    }

    if let Some(hints) = &card.indicators {
        if hints.know_it > 0.0 {
            out.push_str(&format!("\n      I know it {:.0}%", hints.know_it * 100.0));
        }
        if hints.learn_again > 0.0 {
            out.push_str(&format!("\n      Learn again {:.0}%", hints.learn_again * 100.0));
        }
    }
    out
}

/// One-line statistics summary.
pub fn describe_stats(stats: &SessionStats) -> String {
    format!(
        "remembered {}, learn again {}, cancelled swipes {}",
        stats.remembered, stats.not_remembered, stats.cancelled
    )
}
