//! The composed widget: every controller behind one event-driven facade.
//!
//! The host forwards input, advances the clock and drains [`WidgetEvent`]s.
//! Everything the renderer needs comes from [`PrinterWidget::view`].

use std::fmt::Write as _;

use crate::anchor::{AnchorSync, MouthState, Rect};
use crate::config::{ConfigError, PrinterConfig};
use crate::drag::{DragController, DragRelease, PointerTarget};
use crate::eye::{
    countdown_rotation, EffectiveEyeMode, EyeController, LookDirection, PupilBounds, PupilOffset,
};
use crate::geometry::{Geometry, Position, Viewport};
use crate::input::{PaperInput, SubmitGate};
use crate::menu::{ActionMenuState, ActionOutcome, ActionPath, ActionSpec};
use crate::sequencer::{AnimationPhase, AnimationSequencer, SequencerEffect};
use crate::timer::{Millis, Scheduler, TimerEvent};

/// Something the host has to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Focus the paper's text field.
    FocusInput,
    /// Measure the mouth and container and call
    /// [`PrinterWidget::publish_mouth_anchor`].
    MeasureMouth,
    Submit(String),
    ValueChange(String),
    /// The antenna was clicked while loading.
    Abort,
    InvokeAction { path: ActionPath, value: String },
    InvokeResultAction { index: usize, value: String },
}

/// Eye rendering state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    pub mode: EffectiveEyeMode,
    pub blinking: bool,
    pub pupils_visible: bool,
    pub pupil_offset: PupilOffset,
    pub countdown: Option<u32>,
    /// Rotation for the countdown digit, degrees.
    pub countdown_rotation: f64,
}

/// Snapshot of everything needed for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub phase: AnimationPhase,
    pub is_rotated: bool,
    pub is_head_turned: bool,
    pub is_mouth_open: bool,
    pub is_paper_visible: bool,
    pub geometry: Geometry,
    pub position: Position,
    pub draggable: bool,
    pub dragging: bool,
    pub eye: EyeView,
    pub paper_offset: f64,
    pub input_locked: bool,
    pub loading: bool,
    pub hint: Option<&'static str>,
    pub rotate_duration: Millis,
    pub paper_duration: Millis,
}

impl WidgetView {
    /// Inline style for the widget container: CSS custom properties for the
    /// stylesheet plus fixed positioning when draggable.
    pub fn container_style(&self) -> String {
        let g = &self.geometry;
        let mut style = format!(
            "--rotate-duration: {}ms; --paper-duration: {}ms; --tilt-x: {}deg; --tilt-y: {}deg; \
             --rotate-direction: {}deg; --shadow-x: {}px; --shadow-y: {}px;",
            self.rotate_duration,
            self.paper_duration,
            g.tilt.tilt_x,
            g.tilt.tilt_y,
            g.rotate_degrees,
            g.shadow.x,
            g.shadow.y,
        );
        if self.draggable {
            let cursor = if self.dragging { "grabbing" } else { "grab" };
            let _ = write!(
                style,
                " position: fixed; left: {}px; top: {}px; \
                 transform: translate(-50%, -50%); cursor: {};",
                self.position.x, self.position.y, cursor
            );
        }
        style
    }

    /// Inline style for an overlay anchored to the mouth.
    pub fn overlay_style(&self, width: Option<f64>) -> String {
        let mut style = format!(
            "{}: {}px;",
            self.geometry.direction.anchor_side(),
            self.paper_offset
        );
        if let Some(width) = width {
            let _ = write!(style, " width: {width}px;");
        }
        style
    }

    /// Head rotation in degrees, zero when upright.
    pub fn head_rotation(&self) -> f64 {
        if self.is_head_turned {
            self.geometry.rotate_degrees
        } else {
            0.0
        }
    }
}

/// Robot printer widget.
#[derive(Debug, Clone)]
pub struct PrinterWidget {
    config: PrinterConfig,
    viewport: Viewport,
    position: Position,
    loading: bool,
    delay: u32,
    actions: Vec<ActionSpec>,
    scheduler: Scheduler<TimerEvent>,
    sequencer: AnimationSequencer,
    drag: DragController,
    eyes: EyeController,
    anchor: AnchorSync,
    menu: ActionMenuState,
    input: PaperInput,
    events: Vec<WidgetEvent>,
    disposed: bool,
}

impl PrinterWidget {
    /// Builds a widget in `idle`. `seed` drives the blink randomness.
    pub fn new(config: PrinterConfig, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, viewport, seed))
    }

    /// Like [`PrinterWidget::new`], but an invalid config is replaced by the
    /// defaults. The rejection reason is handed back for logging.
    pub fn new_or_default(
        config: PrinterConfig,
        viewport: Viewport,
        seed: u64,
    ) -> (Self, Option<ConfigError>) {
        match config.validate() {
            Ok(()) => (Self::build(config, viewport, seed), None),
            Err(err) => (Self::build(PrinterConfig::default(), viewport, seed), Some(err)),
        }
    }

    fn build(config: PrinterConfig, viewport: Viewport, seed: u64) -> Self {
        let mut widget = Self {
            viewport,
            position: config.initial_position(viewport),
            loading: false,
            delay: 0,
            actions: Vec::new(),
            scheduler: Scheduler::new(),
            sequencer: AnimationSequencer::new(config.timings()),
            drag: DragController::new(config.draggable),
            eyes: EyeController::new(seed),
            anchor: AnchorSync::new(),
            menu: ActionMenuState::new(),
            input: PaperInput::new(config.default_value.clone()),
            events: Vec::new(),
            disposed: false,
            config,
        };
        widget.eyes.set_follow_pointer(widget.config.follow_pointer);
        widget.apply_eye_mode();
        widget.refresh();
        tracing::debug!(
            x = widget.position.x,
            y = widget.position.y,
            draggable = widget.config.draggable,
            "printer widget created"
        );
        widget
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Applies a new config in place. Position, input and any sequence in
    /// flight are kept; new timings take effect from the next phase.
    pub fn reconfigure(&mut self, config: PrinterConfig) -> Result<(), ConfigError> {
        if self.disposed {
            return Ok(());
        }
        config.validate()?;
        if self.sequencer.timings() != config.timings() {
            tracing::debug!(
                rotate = config.rotate_duration,
                paper = config.paper_duration,
                "sequencer timings changed"
            );
            self.sequencer.set_timings(config.timings());
        }
        self.drag.set_enabled(config.draggable);
        self.eyes.set_follow_pointer(config.follow_pointer);
        self.config = config;
        self.apply_eye_mode();
        self.refresh();
        Ok(())
    }

    pub fn phase(&self) -> AnimationPhase {
        self.sequencer.phase()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Seconds of countdown left.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    pub fn menu(&self) -> &ActionMenuState {
        &self.menu
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current time on the widget's clock.
    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.scheduler.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::derive(
            self.position,
            self.viewport,
            self.config.tilt_strength,
            self.config.shadow_strength,
        )
    }

    fn gate(&self) -> SubmitGate {
        SubmitGate {
            loading: self.loading,
            delay: self.delay,
        }
    }

    /// Re-derives everything that depends on phase and position.
    fn refresh(&mut self) {
        let phase = self.sequencer.phase();
        let direction = self.geometry().direction;

        self.eyes
            .set_look_direction(phase.is_paper_visible().then_some(LookDirection::Down));
        if !phase.is_paper_visible() {
            self.menu.reset(&mut self.scheduler);
        }
        self.anchor.observe(
            MouthState {
                open: phase.is_mouth_open(),
                rotated: phase.is_rotated(),
                direction,
            },
            &mut self.scheduler,
        );
    }

    fn apply_eye_mode(&mut self) {
        let mode = EffectiveEyeMode::resolve(&self.config.eye_mode, self.loading, self.delay);
        let interval = self.config.eye_mode.blink_interval().unwrap_or_default();
        self.eyes.set_mode(mode, interval, &mut self.scheduler);
    }

    /// Opens from `idle`, closes from `expanded`, otherwise does nothing.
    pub fn toggle(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let started = self.sequencer.toggle(self.loading, &mut self.scheduler);
        if started {
            self.refresh();
        }
        started
    }

    /// A DOM click on the robot head. Swallowed while a drag session or
    /// its grace window is live.
    pub fn click_head(&mut self) -> bool {
        if self.disposed || !self.drag.should_forward_click() {
            return false;
        }
        self.toggle()
    }

    pub fn pointer_down(&mut self, pointer: Position, target: PointerTarget) -> bool {
        if self.disposed {
            return false;
        }
        self.drag.pointer_down(pointer, target, self.position)
    }

    pub fn pointer_move(&mut self, pointer: Position) -> bool {
        if self.disposed {
            return false;
        }
        let Some(position) = self.drag.pointer_move(pointer) else {
            return false;
        };
        self.position = position;
        self.refresh();
        true
    }

    /// Ends a drag session; a click-sized release toggles.
    pub fn pointer_up(&mut self, pointer: Position) -> Option<DragRelease> {
        if self.disposed {
            return None;
        }
        let release = self.drag.pointer_up(pointer, &mut self.scheduler)?;
        if release == DragRelease::Click {
            self.toggle();
        }
        Some(release)
    }

    /// Pointer capture was lost mid-drag.
    pub fn pointer_cancel(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Host-driven move, e.g. respawn after a resize. Ignored mid-drag.
    pub fn set_position(&mut self, position: Position) -> bool {
        if self.disposed || self.drag.is_dragging() {
            return false;
        }
        self.position = position;
        self.refresh();
        true
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.disposed {
            return;
        }
        self.viewport = viewport;
        self.refresh();
    }

    pub fn set_loading(&mut self, loading: bool) {
        if self.disposed || self.loading == loading {
            return;
        }
        self.loading = loading;
        self.apply_eye_mode();
    }

    pub fn set_delay(&mut self, delay: u32) {
        if self.disposed || self.delay == delay {
            return;
        }
        self.delay = delay;
        self.apply_eye_mode();
    }

    pub fn set_actions(&mut self, actions: Vec<ActionSpec>) {
        if self.actions != actions {
            self.actions = actions;
            self.menu.reset(&mut self.scheduler);
        }
    }

    /// Pointer moved anywhere in the document.
    pub fn eye_pointer_move(&mut self, eyes_center: Position, pointer: Position) -> bool {
        !self.disposed && self.eyes.pointer_moved(eyes_center, pointer)
    }

    pub fn set_pupil_bounds(&mut self, bounds: PupilBounds) {
        self.eyes.set_bounds(bounds);
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        if self.disposed {
            return;
        }
        if self.input.set_value(value) {
            self.events
                .push(WidgetEvent::ValueChange(self.input.value().to_string()));
        }
    }

    pub fn composition_start(&mut self) {
        self.input.composition_start();
    }

    pub fn composition_end(&mut self) {
        self.input.composition_end();
    }

    /// Key pressed in the paper's field. Returns true if it submitted.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.disposed {
            return false;
        }
        match self.input.key_down(key, self.gate()) {
            Some(value) => {
                self.events.push(WidgetEvent::Submit(value));
                true
            }
            None => false,
        }
    }

    /// Antenna ball clicked. Only aborts while loading.
    pub fn abort(&mut self) -> bool {
        if self.disposed || !self.loading {
            return false;
        }
        self.events.push(WidgetEvent::Abort);
        true
    }

    pub fn hover_action(&mut self, index: usize) {
        self.menu.hover(index);
    }

    pub fn leave_action(&mut self, index: usize) {
        self.menu.leave(index);
    }

    pub fn activate_action(&mut self, path: ActionPath) -> ActionOutcome {
        if self.disposed {
            return ActionOutcome::Ignored;
        }
        let outcome = self.menu.activate(&self.actions, path, &mut self.scheduler);
        if let ActionOutcome::Invoke(path) = outcome {
            self.events.push(WidgetEvent::InvokeAction {
                path,
                value: self.input.value().to_string(),
            });
        }
        outcome
    }

    pub fn activate_result_action(&mut self, index: usize) {
        if self.disposed {
            return;
        }
        self.events.push(WidgetEvent::InvokeResultAction {
            index,
            value: self.input.value().to_string(),
        });
    }

    /// Stores a fresh mouth measurement and returns the new overlay offset.
    pub fn publish_mouth_anchor(&mut self, mouth: Rect, container: Rect) -> f64 {
        let direction = self.geometry().direction;
        self.anchor.publish(mouth, container, direction)
    }

    /// Fires every timer due up to `now`, in order, then moves the clock.
    pub fn advance_to(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        while let Some((_, event)) = self.scheduler.pop_due(now) {
            self.dispatch(event);
        }
        self.scheduler.advance_to(now);
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::PhaseElapsed { from } => {
                let effect = self.sequencer.on_phase_elapsed(from, &mut self.scheduler);
                if effect == Some(SequencerEffect::FocusInput) {
                    self.events.push(WidgetEvent::FocusInput);
                }
                self.refresh();
            }
            TimerEvent::BlinkStart => self.eyes.on_blink_start(&mut self.scheduler),
            TimerEvent::BlinkEnd => self.eyes.on_blink_end(&mut self.scheduler),
            TimerEvent::MouthSettled => {
                self.anchor.on_settled();
                self.events.push(WidgetEvent::MeasureMouth);
            }
            TimerEvent::ClickGraceExpired => self.drag.on_grace_expired(),
            TimerEvent::ActionTipExpired(path) => self.menu.on_tip_expired(path),
        }
    }

    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> WidgetView {
        let phase = self.sequencer.phase();
        let geometry = self.geometry();
        let is_head_turned = phase.is_head_turned();
        let head_rotation = if is_head_turned {
            geometry.rotate_degrees
        } else {
            0.0
        };

        WidgetView {
            phase,
            is_rotated: phase.is_rotated(),
            is_head_turned,
            is_mouth_open: phase.is_mouth_open(),
            is_paper_visible: phase.is_paper_visible(),
            geometry,
            position: self.position,
            draggable: self.config.draggable,
            dragging: self.drag.is_dragging(),
            eye: EyeView {
                mode: self.eyes.mode(),
                blinking: self.eyes.is_blinking(),
                pupils_visible: self.eyes.pupils_visible(),
                pupil_offset: self.eyes.pupil_offset(),
                countdown: self.eyes.countdown(),
                countdown_rotation: countdown_rotation(head_rotation),
            },
            paper_offset: self.anchor.offset(),
            input_locked: self.gate().is_locked(),
            loading: self.loading,
            hint: self.config.hint_text(),
            rotate_duration: self.config.rotate_duration,
            paper_duration: self.config.paper_duration,
        }
    }

    /// Cancels every timer and session. Later calls do nothing.
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.sequencer.teardown(&mut self.scheduler);
        self.drag.teardown(&mut self.scheduler);
        self.eyes.teardown(&mut self.scheduler);
        self.anchor.teardown(&mut self.scheduler);
        self.menu.reset(&mut self.scheduler);
        self.scheduler.clear();
        self.events.clear();
        self.disposed = true;
        tracing::debug!("printer widget torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::OverlayRegion;
    use crate::geometry::MAX_TILT_DEG;

    const VIEWPORT: Viewport = Viewport::new(1000.0, 800.0);

    fn widget(config: PrinterConfig) -> PrinterWidget {
        PrinterWidget::new(config, VIEWPORT, 99).unwrap()
    }

    fn draggable() -> PrinterConfig {
        PrinterConfig {
            draggable: true,
            default_position: Some(Position::new(900.0, 700.0)),
            ..PrinterConfig::default()
        }
    }

    /// Advances in 1 ms steps, recording each distinct phase seen.
    fn phases_until(widget: &mut PrinterWidget, until: Millis) -> Vec<AnimationPhase> {
        let mut seen = vec![widget.phase()];
        let mut now = widget.now();
        while now < until {
            now += 1;
            widget.advance_to(now);
            if seen.last() != Some(&widget.phase()) {
                seen.push(widget.phase());
            }
        }
        seen
    }

    fn take_events(widget: &mut PrinterWidget, keep: fn(&WidgetEvent) -> bool) -> Vec<WidgetEvent> {
        widget.drain_events().into_iter().filter(keep).collect()
    }

    #[test]
    fn test_full_cycle_phase_order() {
        let mut w = widget(PrinterConfig::default());
        assert!(w.toggle());
        let mut seen = phases_until(&mut w, 2_000);
        assert_eq!(w.phase(), AnimationPhase::Expanded);
        assert!(w.toggle());
        seen.extend(phases_until(&mut w, 4_000));
        seen.dedup();
        assert_eq!(
            seen,
            vec![
                AnimationPhase::Rotating,
                AnimationPhase::MouthOpening,
                AnimationPhase::PaperOut,
                AnimationPhase::Expanded,
                AnimationPhase::PaperIn,
                AnimationPhase::MouthClosing,
                AnimationPhase::RotatingBack,
                AnimationPhase::Idle,
            ]
        );
    }

    #[test]
    fn test_focus_arrives_at_1300ms() {
        let mut w = widget(PrinterConfig {
            rotate_duration: 400,
            paper_duration: 600,
            ..PrinterConfig::default()
        });
        w.drain_events();
        w.toggle();

        w.advance_to(1_299);
        let focus = take_events(&mut w, |e| *e == WidgetEvent::FocusInput);
        assert!(focus.is_empty());

        w.advance_to(1_300);
        let focus = take_events(&mut w, |e| *e == WidgetEvent::FocusInput);
        assert_eq!(focus, vec![WidgetEvent::FocusInput]);
    }

    #[test]
    fn test_rapid_double_toggle() {
        let mut w = widget(PrinterConfig::default());
        assert!(w.toggle());
        assert!(!w.toggle());
        w.advance_to(10_000);
        let focus = take_events(&mut w, |e| *e == WidgetEvent::FocusInput);
        assert_eq!(focus.len(), 1);
        assert_eq!(w.phase(), AnimationPhase::Expanded);
    }

    #[test]
    fn test_loading_blocks_toggle_and_forces_loading_eyes() {
        let mut w = widget(PrinterConfig::default());
        w.set_loading(true);
        w.set_delay(3);
        assert!(!w.toggle());
        assert_eq!(w.view().eye.mode, EffectiveEyeMode::Loading);
        assert!(!w.view().eye.pupils_visible);

        w.set_loading(false);
        assert_eq!(w.view().eye.mode, EffectiveEyeMode::Countdown(3));
        w.set_delay(0);
        assert_eq!(w.view().eye.mode, EffectiveEyeMode::Normal);
    }

    #[test]
    fn test_projections_stay_consistent_through_cycle() {
        let mut w = widget(PrinterConfig::default());
        w.toggle();
        for now in 0..4_000 {
            if now == 2_000 {
                w.toggle();
            }
            w.advance_to(now);
            let view = w.view();
            assert_eq!(view.is_paper_visible, view.phase.is_paper_visible());
            if view.is_mouth_open {
                assert!(view.is_rotated);
            }
            if view.is_paper_visible {
                assert!(view.is_mouth_open);
                assert_eq!(view.eye.pupil_offset, PupilOffset { x: 0.0, y: 3.5 });
            }
        }
    }

    #[test]
    fn test_short_drag_is_click() {
        let mut w = widget(draggable());
        assert!(w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body));
        w.pointer_move(Position::new(902.0, 701.0));
        assert_eq!(w.pointer_up(Position::new(902.0, 701.0)), Some(DragRelease::Click));
        assert_eq!(w.phase(), AnimationPhase::Rotating);

        // The synthetic click after mouseup must not toggle again
        assert!(!w.click_head());
    }

    #[test]
    fn test_long_drag_moves_without_toggling() {
        let mut w = widget(draggable());
        w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body);
        w.pointer_move(Position::new(200.0, 100.0));
        assert_eq!(w.position(), Position::new(200.0, 100.0));
        assert_eq!(w.pointer_up(Position::new(200.0, 100.0)), Some(DragRelease::Drag));
        assert!(!w.click_head());
        assert_eq!(w.phase(), AnimationPhase::Idle);

        w.advance_to(w.now() + 10);
        assert!(w.click_head());
        assert_eq!(w.phase(), AnimationPhase::Rotating);
    }

    #[test]
    fn test_drag_flips_direction_and_remeasures() {
        let mut w = widget(draggable());
        w.advance_to(0);
        w.drain_events();
        assert_eq!(w.geometry().direction, crate::geometry::PaperDirection::Left);

        w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body);
        w.pointer_move(Position::new(100.0, 700.0));
        assert_eq!(w.geometry().direction, crate::geometry::PaperDirection::Right);
        w.advance_to(w.now());
        assert!(w.drain_events().contains(&WidgetEvent::MeasureMouth));
    }

    #[test]
    fn test_overlay_press_never_drags() {
        let mut w = widget(draggable());
        let paper = PointerTarget::Overlay(OverlayRegion::Paper);
        assert!(!w.pointer_down(Position::new(900.0, 700.0), paper));
        assert!(!w.pointer_move(Position::new(10.0, 10.0)));
        assert_eq!(w.position(), Position::new(900.0, 700.0));
    }

    #[test]
    fn test_host_position_ignored_mid_drag() {
        let mut w = widget(draggable());
        w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body);
        assert!(!w.set_position(Position::new(1.0, 1.0)));
        w.pointer_cancel();
        assert!(w.set_position(Position::new(1.0, 1.0)));
    }

    #[test]
    fn test_non_draggable_click_toggles() {
        let mut w = widget(PrinterConfig::default());
        assert!(!w.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body));
        assert!(w.click_head());
        assert_eq!(w.phase(), AnimationPhase::Rotating);
    }

    #[test]
    fn test_submission_gate() {
        let mut w = widget(PrinterConfig::default());
        w.set_value("hello");
        assert!(w.key_down("Enter"));
        w.set_delay(2);
        assert!(!w.key_down("Enter"));
        w.set_delay(0);
        w.composition_start();
        assert!(!w.key_down("Enter"));
        w.composition_end();

        let events = take_events(&mut w, |e| {
            matches!(e, WidgetEvent::Submit(_) | WidgetEvent::ValueChange(_))
        });
        assert_eq!(
            events,
            vec![
                WidgetEvent::ValueChange("hello".to_string()),
                WidgetEvent::Submit("hello".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_handler_tip_within_1500ms() {
        let mut w = widget(PrinterConfig::default());
        w.set_actions(vec![ActionSpec::new("Soon")]);
        w.toggle();
        w.advance_to(2_000);
        w.drain_events();

        let path = ActionPath::top(0);
        let start = w.now();
        assert_eq!(w.activate_action(path), ActionOutcome::ShowTip(path));
        assert!(w.menu().is_tip_visible(path));
        w.advance_to(start + 1_500);
        assert!(!w.menu().is_tip_visible(path));
        assert!(!w
            .drain_events()
            .iter()
            .any(|e| matches!(e, WidgetEvent::InvokeAction { .. })));
    }

    #[test]
    fn test_action_invocation_carries_value() {
        let mut w = widget(PrinterConfig::default());
        w.set_actions(vec![ActionSpec::new("Summarize").with_handler()]);
        w.set_value("text");
        w.drain_events();
        w.activate_action(ActionPath::top(0));
        assert_eq!(
            w.drain_events(),
            vec![WidgetEvent::InvokeAction {
                path: ActionPath::top(0),
                value: "text".to_string()
            }]
        );
    }

    #[test]
    fn test_abort_only_while_loading() {
        let mut w = widget(PrinterConfig::default());
        assert!(!w.abort());
        w.set_loading(true);
        assert!(w.abort());
        assert_eq!(w.drain_events().last(), Some(&WidgetEvent::Abort));
    }

    #[test]
    fn test_mouth_measured_after_settle() {
        let mut w = widget(PrinterConfig::default());
        w.advance_to(0);
        w.drain_events();

        w.toggle();
        // rotating: mouth closed, rotated -> immediate measure
        w.advance_to(0);
        assert!(w.drain_events().contains(&WidgetEvent::MeasureMouth));

        // mouth-opening at 400, measured 200 ms later
        w.advance_to(599);
        assert!(!w.drain_events().contains(&WidgetEvent::MeasureMouth));
        w.advance_to(600);
        assert!(w.drain_events().contains(&WidgetEvent::MeasureMouth));

        let container = Rect::new(850.0, 650.0, 100.0, 100.0);
        let mouth = Rect::new(890.0, 700.0, 20.0, 6.0);
        let offset = w.publish_mouth_anchor(mouth, container);
        assert!((offset - 50.0).abs() < f64::EPSILON);
        assert!((w.view().paper_offset - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_teardown_is_idempotent_and_final() {
        let mut w = widget(draggable());
        w.toggle();
        w.pointer_down(Position::new(0.0, 0.0), PointerTarget::Body);
        w.teardown();
        w.teardown();
        assert_eq!(w.pending_timers(), 0);
        assert!(!w.is_dragging());
        assert!(!w.toggle());
        w.advance_to(10_000);
        assert!(w.drain_events().is_empty());
        assert_eq!(w.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_container_style() {
        let w = widget(draggable());
        let style = w.view().container_style();
        assert!(style.contains("--rotate-duration: 400ms;"));
        assert!(style.contains("--rotate-direction: 90deg;"));
        assert!(style.contains("position: fixed; left: 900px; top: 700px;"));
        assert!(style.contains("cursor: grab;"));

        let w = widget(PrinterConfig::default());
        assert!(!w.view().container_style().contains("position: fixed"));
    }

    #[test]
    fn test_overlay_style_follows_direction() {
        let w = widget(draggable());
        assert_eq!(w.view().overlay_style(Some(500.0)), "right: 85px; width: 500px;");

        let mut config = draggable();
        config.default_position = Some(Position::new(100.0, 100.0));
        let w = widget(config);
        assert_eq!(w.view().overlay_style(None), "left: 85px;");
    }

    #[test]
    fn test_second_toggle_ignored_while_collapsing() {
        let mut w = widget(PrinterConfig::default());
        w.toggle();
        w.advance_to(2_000);
        assert!(w.toggle());
        assert_eq!(w.phase(), AnimationPhase::PaperIn);
        assert!(!w.toggle());
        assert_eq!(phases_until(&mut w, 4_000).last(), Some(&AnimationPhase::Idle));
    }

    #[test]
    fn test_offscreen_position_keeps_tilt_capped() {
        let mut w = widget(draggable());
        w.set_position(Position::new(-5_000.0, 9_000.0));
        let tilt = w.view().geometry.tilt;
        assert!(tilt.tilt_x.abs() <= MAX_TILT_DEG + 1e-9);
        assert!(tilt.tilt_y.abs() <= MAX_TILT_DEG + 1e-9);
    }

    #[test]
    fn test_reconfigure_keeps_sequence_and_retimes_next_phase() {
        let mut w = widget(PrinterConfig::default());
        w.toggle();
        let faster = PrinterConfig {
            rotate_duration: 100,
            paper_duration: 200,
            ..PrinterConfig::default()
        };
        w.reconfigure(faster).unwrap();
        assert_eq!(w.phase(), AnimationPhase::Rotating);

        // Rotation in flight keeps 400 ms, then 300 ms mouth, then 200 ms paper
        w.advance_to(899);
        assert!(take_events(&mut w, |e| *e == WidgetEvent::FocusInput).is_empty());
        w.advance_to(900);
        assert_eq!(w.phase(), AnimationPhase::Expanded);
        assert_eq!(take_events(&mut w, |e| *e == WidgetEvent::FocusInput).len(), 1);
        assert_eq!(w.view().rotate_duration, 100);
    }

    #[test]
    fn test_reconfigure_drag_and_pointer_follow() {
        let mut w = widget(draggable());
        w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body);
        assert!(w.is_dragging());

        let config = PrinterConfig {
            draggable: false,
            follow_pointer: false,
            ..draggable()
        };
        w.reconfigure(config).unwrap();
        assert!(!w.is_dragging());
        assert_eq!(w.position(), Position::new(900.0, 700.0));
        assert!(!w.pointer_down(Position::new(900.0, 700.0), PointerTarget::Body));
        assert!(!w.eye_pointer_move(Position::new(0.0, 0.0), Position::new(500.0, 0.0)));
        assert_eq!(w.view().eye.pupil_offset, PupilOffset::default());
    }

    #[test]
    fn test_reconfigure_rejects_invalid_config() {
        let mut w = widget(draggable());
        let err = w.reconfigure(PrinterConfig {
            rotate_duration: 0,
            ..PrinterConfig::default()
        });
        assert_eq!(err, Err(ConfigError::ZeroDuration("rotate_duration")));
        assert_eq!(w.config(), &draggable());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PrinterConfig {
            paper_duration: 0,
            ..PrinterConfig::default()
        };
        assert!(PrinterWidget::new(config.clone(), VIEWPORT, 1).is_err());

        let (w, err) = PrinterWidget::new_or_default(config, VIEWPORT, 1);
        assert_eq!(err, Some(ConfigError::ZeroDuration("paper_duration")));
        assert_eq!(w.config(), &PrinterConfig::default());
    }
}
