//! Animation timeline and tweened card motion.
//!
//! Completions are not closures: a card schedules a [`Cue`] on the
//! [`Timeline`] and receives it back as a [`Completion`] when the host
//! advances time. Every scheduled cue carries the [`MountId`] of the card that
//! asked for it, so completions for a card that has since been unmounted can
//! be recognised and dropped.

use std::f32::consts::PI;

/// Identity of one card mount. A remounted card gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

/// Handle to a pending animation or timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    id: u64,
    mount: MountId,
}

impl AnimationHandle {
    pub fn mount(&self) -> MountId {
        self.mount
    }
}

/// What a card is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Reveal delay elapsed: detail content may be shown.
    DetailsVisible,
    /// Flip to the face-up side finished.
    FlipComplete,
    /// Spring back to rest after a cancelled swipe finished.
    ReturnComplete,
    /// Commit fly-off finished.
    FlyOffComplete,
    /// Off-screen hold after a "remember" commit elapsed.
    HoldElapsed,
    /// Return to rest after a "do not remember" fly-off finished.
    SnapBackComplete,
}

/// A cue whose time has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub handle: AnimationHandle,
    pub cue: Cue,
    /// Time the cue was due; follow-up animations start from here.
    pub due_ms: u64,
}

#[derive(Debug, Clone)]
struct Pending {
    handle: AnimationHandle,
    due_ms: u64,
    cue: Cue,
}

/// Single-threaded scheduler for card timers.
#[derive(Debug, Default)]
pub struct Timeline {
    next_id: u64,
    next_mount: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a mount id for a newly created card.
    pub fn mount(&mut self) -> MountId {
        self.next_mount += 1;
        MountId(self.next_mount)
    }

    /// Schedule `cue` to complete `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, mount: MountId, cue: Cue, now_ms: u64, delay_ms: u64) -> AnimationHandle {
        self.next_id += 1;
        let handle = AnimationHandle {
            id: self.next_id,
            mount,
        };
        self.pending.push(Pending {
            handle,
            due_ms: now_ms.saturating_add(delay_ms),
            cue,
        });
        handle
    }

    /// Cancel a pending cue. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Cancel everything scheduled by one mount. Returns how many were dropped.
    pub fn cancel_mount(&mut self, mount: MountId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle.mount != mount);
        before - self.pending.len()
    }

    pub fn is_pending(&self, handle: AnimationHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Earliest due time among pending cues.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every cue due at or before `now_ms`, oldest first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<Completion> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by_key(|p| (p.due_ms, p.handle.id));
        due.into_iter()
            .map(|p| Completion {
                handle: p.handle,
                cue: p.cue,
                due_ms: p.due_ms,
            })
            .collect()
    }
}

/// Easing applied to a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    EaseOut,
    /// Under-damped spring that settles exactly on the target at the end.
    Spring,
}

impl Curve {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::Spring => 1.0 - (-6.0 * t).exp() * (2.5 * PI * t).cos(),
        }
    }
}

/// A scalar animated over time, or held at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
    curve: Curve,
}

impl Motion {
    pub fn at_rest(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: 0,
            duration_ms: 0,
            curve: Curve::Linear,
        }
    }

    pub fn tween(from: f32, to: f32, start_ms: u64, duration_ms: u64, curve: Curve) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            curve,
        }
    }

    /// Continue from wherever this motion is at `now_ms` towards `to`.
    pub fn retarget(&self, to: f32, now_ms: u64, duration_ms: u64, curve: Curve) -> Self {
        Self::tween(self.value_at(now_ms), to, now_ms, duration_ms, curve)
    }

    pub fn value_at(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if self.duration_ms == 0 || elapsed >= self.duration_ms {
            return self.to;
        }
        let t = elapsed as f32 / self.duration_ms as f32;
        self.from + (self.to - self.from) * self.curve.apply(t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_settled(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }
}
