//! Keeps overlays pinned to the robot's mouth.
//!
//! The mouth moves whenever the head turns or the mouth opens, so after each
//! such change the renderer is asked to measure it again once its CSS
//! transition has settled.

use crate::geometry::{PaperDirection, Position};
use crate::timer::{Millis, Scheduler, TimerEvent, TimerId};

/// Mouth open/close CSS transition length.
pub const MOUTH_SETTLE_MS: Millis = 200;

/// Offset used before the first measurement.
pub const DEFAULT_PAPER_OFFSET: f64 = 85.0;

/// Bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Distance from the container edge the paper grows from to the anchor.
pub fn paper_offset(direction: PaperDirection, container: Rect, anchor_x: f64) -> f64 {
    match direction {
        PaperDirection::Left => container.right() - anchor_x,
        PaperDirection::Right => anchor_x - container.left,
    }
}

/// Mouth geometry inputs whose change requires a new measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouthState {
    pub open: bool,
    pub rotated: bool,
    pub direction: PaperDirection,
}

#[derive(Debug, Clone)]
pub struct AnchorSync {
    offset: f64,
    last_state: Option<MouthState>,
    pending: Option<TimerId>,
}

impl Default for AnchorSync {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorSync {
    pub fn new() -> Self {
        Self {
            offset: DEFAULT_PAPER_OFFSET,
            last_state: None,
            pending: None,
        }
    }

    /// Current container-relative offset for paper, menu, panel and info bar.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Records the latest mouth state and schedules a measurement if it
    /// differs from the previous one. A newer change supersedes a pending
    /// measurement. Returns true if a measurement was scheduled.
    pub fn observe(&mut self, state: MouthState, scheduler: &mut Scheduler<TimerEvent>) -> bool {
        if self.last_state == Some(state) {
            return false;
        }
        self.last_state = Some(state);

        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        let delay = if state.open { MOUTH_SETTLE_MS } else { 0 };
        tracing::trace!(delay, ?state, "mouth measurement scheduled");
        self.pending = Some(scheduler.schedule(delay, TimerEvent::MouthSettled));
        true
    }

    /// The settle timer fired; the renderer should measure now.
    pub fn on_settled(&mut self) {
        self.pending = None;
    }

    /// Stores a measured mouth box and recomputes the offset.
    pub fn publish(&mut self, mouth: Rect, container: Rect, direction: PaperDirection) -> f64 {
        self.offset = paper_offset(direction, container, mouth.center().x);
        tracing::trace!(offset = self.offset, "paper offset updated");
        self.offset
    }

    /// Forgets everything, including the last observed state, so a remount
    /// measures from scratch.
    pub fn teardown(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        self.last_state = None;
    }
}
