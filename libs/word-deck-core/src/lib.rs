//! Swipeable word deck for vocabulary study.
//!
//! Provides:
//! - Two-slot deck buffer with random refill (`DeckController`)
//! - Per-card tap/flip/drag state machine (`CardGestureMachine`)
//! - Animation timeline with mount-tagged completions
//! - Study session wiring the deck to its collaborators
//! - Pure view model rendering

pub mod animation;
pub mod deck;
pub mod error;
pub mod gesture;
pub mod ports;
pub mod rng;
pub mod session;
pub mod types;
pub mod view;

pub use animation::{AnimationHandle, Completion, Cue, Motion, MountId, Timeline};
pub use deck::{placeholder_count, DeckController, DeckSlot};
pub use error::{DeckError, Result};
pub use gesture::{indicator_opacity, CardGestureMachine, CardPhase, CardState, Indicators, ReleaseOutcome};
pub use ports::{AudioPlayer, LearnedSink, WordSource};
pub use rng::DeckRng;
pub use session::{SessionStats, StudySession};
pub use types::{
    CardOutcome, Decision, DeckSettings, SlotKind, StudySet, WordDetail, WordEntry, WordId,
};
pub use view::{render, CardTransform, CardView, DeckView, Placeholder};
