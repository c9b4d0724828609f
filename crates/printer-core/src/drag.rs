//! Pointer sessions that tell a click from a drag.

use crate::geometry::Position;
use crate::timer::{Millis, Scheduler, TimerEvent, TimerId};

/// Releases closer than this to the press point count as clicks.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// How long the browser's synthetic click is swallowed after a release.
pub const CLICK_GRACE_MS: Millis = 10;

/// Parts of the widget whose pointer events must never move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayRegion {
    Paper,
    ActionMenu,
    ResultPanel,
    InfoBar,
    Antenna,
}

impl OverlayRegion {
    pub const ALL: [OverlayRegion; 5] = [
        Self::Paper,
        Self::ActionMenu,
        Self::ResultPanel,
        Self::InfoBar,
        Self::Antenna,
    ];

    /// CSS class marking the region in the rendered tree.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::ActionMenu => "action-menu",
            Self::ResultPanel => "result-panel",
            Self::InfoBar => "info-bar",
            Self::Antenna => "antenna",
        }
    }
}

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The robot itself.
    Body,
    /// Inside a protected overlay.
    Overlay(OverlayRegion),
}

/// Live pointer session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position at press.
    pub start: Position,
    /// Widget position at press.
    pub origin: Position,
}

impl DragSession {
    /// Widget position for the given pointer: origin plus the raw delta.
    pub fn position_for(&self, pointer: Position) -> Position {
        Position::new(
            self.origin.x + (pointer.x - self.start.x),
            self.origin.y + (pointer.y - self.start.y),
        )
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRelease {
    /// Barely moved: treat as a click on the robot.
    Click,
    /// Moved the widget.
    Drag,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    enabled: bool,
    session: Option<DragSession>,
    grace: Option<TimerId>,
}

impl DragController {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            session: None,
            grace: None,
        }
    }

    /// Turning dragging off drops a live session.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session unless dragging is off or the press hit an overlay.
    pub fn pointer_down(
        &mut self,
        pointer: Position,
        target: PointerTarget,
        position: Position,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        if let PointerTarget::Overlay(region) = target {
            tracing::trace!(?region, "pointer down on overlay, not dragging");
            return false;
        }
        self.session = Some(DragSession {
            start: pointer,
            origin: position,
        });
        tracing::debug!(x = pointer.x, y = pointer.y, "drag session started");
        true
    }

    /// New widget position while a session is live.
    pub fn pointer_move(&self, pointer: Position) -> Option<Position> {
        self.session.map(|session| session.position_for(pointer))
    }

    /// Ends the session and classifies it. Either way the next click on the
    /// robot is swallowed for [`CLICK_GRACE_MS`], since a classified click
    /// has already toggled.
    pub fn pointer_up(
        &mut self,
        pointer: Position,
        scheduler: &mut Scheduler<TimerEvent>,
    ) -> Option<DragRelease> {
        let session = self.session.take()?;
        let distance = session.start.distance(pointer);

        if let Some(id) = self.grace.take() {
            scheduler.cancel(id);
        }
        self.grace = Some(scheduler.schedule(CLICK_GRACE_MS, TimerEvent::ClickGraceExpired));

        let release = if distance < DRAG_THRESHOLD_PX {
            DragRelease::Click
        } else {
            DragRelease::Drag
        };
        tracing::debug!(distance, ?release, "drag session ended");
        Some(release)
    }

    /// Drops the session without classifying it, e.g. when pointer capture
    /// is lost. The widget stays where it was last moved.
    pub fn cancel(&mut self) -> bool {
        let had_session = self.session.take().is_some();
        if had_session {
            tracing::debug!("drag session cancelled");
        }
        had_session
    }

    pub fn on_grace_expired(&mut self) {
        self.grace = None;
    }

    /// Whether a DOM click on the robot should reach `toggle`.
    pub fn should_forward_click(&self) -> bool {
        self.session.is_none() && self.grace.is_none()
    }

    pub fn teardown(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        self.session = None;
        if let Some(id) = self.grace.take() {
            scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expire_grace(
        drag: &mut DragController,
        scheduler: &mut Scheduler<TimerEvent>,
        until: Millis,
    ) {
        while let Some((_, event)) = scheduler.pop_due(until) {
            if event == TimerEvent::ClickGraceExpired {
                drag.on_grace_expired();
            }
        }
    }

    #[test]
    fn test_disabled_controller_never_starts() {
        let mut drag = DragController::new(false);
        let origin = Position::default();
        assert!(!drag.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body, origin));
        assert!(!drag.is_dragging());
        assert!(drag.should_forward_click());
    }

    #[test]
    fn test_overlays_never_start_sessions() {
        let mut drag = DragController::new(true);
        for region in OverlayRegion::ALL {
            assert!(!drag.pointer_down(
                Position::new(10.0, 10.0),
                PointerTarget::Overlay(region),
                Position::new(100.0, 100.0),
            ));
        }
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_move_applies_raw_delta_without_clamping() {
        let mut drag = DragController::new(true);
        let origin = Position::new(100.0, 200.0);
        drag.pointer_down(Position::new(50.0, 50.0), PointerTarget::Body, origin);

        assert_eq!(drag.pointer_move(Position::new(80.0, 20.0)), Some(Position::new(130.0, 170.0)));
        // Far off-screen is allowed
        assert_eq!(
            drag.pointer_move(Position::new(-1000.0, 50.0)),
            Some(Position::new(-950.0, 200.0))
        );
    }

    #[test]
    fn test_small_movement_is_click() {
        let mut scheduler = Scheduler::new();
        let start = Position::new(100.0, 100.0);
        let ends = [
            Position::new(100.0, 100.0),
            Position::new(103.0, 103.0),
            Position::new(104.9, 100.0),
            Position::new(100.0, 95.1),
        ];
        for end in ends {
            let mut drag = DragController::new(true);
            drag.pointer_down(start, PointerTarget::Body, Position::default());
            // Wander further away mid-session, then come back
            drag.pointer_move(Position::new(300.0, 300.0));
            assert_eq!(drag.pointer_up(end, &mut scheduler), Some(DragRelease::Click), "{end:?}");
        }
    }

    #[test]
    fn test_threshold_distance_is_drag() {
        let mut scheduler = Scheduler::new();
        let mut drag = DragController::new(true);
        drag.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body, Position::default());
        assert_eq!(
            drag.pointer_up(Position::new(3.0, 4.0), &mut scheduler),
            Some(DragRelease::Drag)
        );
    }

    #[test]
    fn test_click_suppressed_during_grace_window() {
        let mut scheduler = Scheduler::new();
        let mut drag = DragController::new(true);
        drag.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body, Position::default());
        assert!(!drag.should_forward_click());

        drag.pointer_up(Position::new(40.0, 0.0), &mut scheduler);
        assert!(!drag.is_dragging());
        assert!(!drag.should_forward_click());

        expire_grace(&mut drag, &mut scheduler, CLICK_GRACE_MS - 1);
        assert!(!drag.should_forward_click());
        expire_grace(&mut drag, &mut scheduler, CLICK_GRACE_MS);
        assert!(drag.should_forward_click());
    }

    #[test]
    fn test_pointer_up_without_session() {
        let mut scheduler = Scheduler::new();
        let mut drag = DragController::new(true);
        assert_eq!(drag.pointer_up(Position::new(1.0, 1.0), &mut scheduler), None);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel_leaves_no_dragging_state() {
        let mut drag = DragController::new(true);
        drag.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body, Position::default());
        assert!(drag.cancel());
        assert!(!drag.cancel());
        assert!(!drag.is_dragging());
        assert!(drag.should_forward_click());
        assert_eq!(drag.pointer_move(Position::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_teardown_clears_grace_timer() {
        let mut scheduler = Scheduler::new();
        let mut drag = DragController::new(true);
        drag.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body, Position::default());
        drag.pointer_up(Position::new(50.0, 0.0), &mut scheduler);
        assert_eq!(scheduler.len(), 1);

        drag.teardown(&mut scheduler);
        drag.teardown(&mut scheduler);
        assert!(scheduler.is_empty());
        assert!(drag.should_forward_click());
    }
}
