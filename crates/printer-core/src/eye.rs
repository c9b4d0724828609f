//! Eye display: blinking, pupil tracking, loading and countdown.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::timer::{Millis, Scheduler, TimerEvent, TimerId};

/// How long the eyes stay shut per blink.
pub const BLINK_CLOSED_MS: Millis = 150;

/// Pointer distance scale for the logarithmic pupil damping.
const TRACKING_SCALE_PX: f64 = 20.0;

/// Random wait between blinks, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkInterval {
    pub min: Millis,
    pub max: Millis,
}

impl Default for BlinkInterval {
    fn default() -> Self {
        Self {
            min: 2000,
            max: 5000,
        }
    }
}

impl BlinkInterval {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    fn sample(&self, rng: &mut impl Rng) -> Millis {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Eye behavior requested by the host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum EyeMode {
    Normal {
        #[serde(default)]
        blink_interval: Option<BlinkInterval>,
    },
    Loading,
    Countdown,
}

impl Default for EyeMode {
    fn default() -> Self {
        Self::Normal {
            blink_interval: Some(BlinkInterval::default()),
        }
    }
}

impl EyeMode {
    /// Blink bounds, only meaningful in normal mode.
    pub fn blink_interval(&self) -> Option<BlinkInterval> {
        match self {
            Self::Normal { blink_interval } => Some(blink_interval.unwrap_or_default()),
            _ => None,
        }
    }
}

/// Mode actually displayed after host state overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveEyeMode {
    Normal,
    Loading,
    /// Seconds left.
    Countdown(u32),
}

impl EffectiveEyeMode {
    /// `loading` beats `delay`, which beats the configured mode.
    pub fn resolve(base: &EyeMode, loading: bool, delay: u32) -> Self {
        if loading {
            Self::Loading
        } else if delay > 0 {
            Self::Countdown(delay)
        } else {
            match base {
                EyeMode::Normal { .. } => Self::Normal,
                EyeMode::Loading => Self::Loading,
                EyeMode::Countdown => Self::Countdown(delay),
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Loading => "loading",
            Self::Countdown(_) => "countdown",
        }
    }
}

/// Fixed gaze that overrides pointer tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Pupil translation in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PupilOffset {
    pub x: f64,
    pub y: f64,
}

/// How far a pupil may move inside its eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PupilBounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for PupilBounds {
    fn default() -> Self {
        Self {
            max_x: 3.0,
            max_y: 3.5,
        }
    }
}

impl PupilBounds {
    /// Derives bounds from rendered eye and pupil sizes, keeping a 1 px rim.
    pub fn from_sizes(
        eye_width: f64,
        eye_height: f64,
        pupil_width: f64,
        pupil_height: f64,
    ) -> Self {
        Self {
            max_x: ((eye_width - pupil_width) / 2.0 - 1.0).max(0.0),
            max_y: ((eye_height - pupil_height) / 2.0 - 1.0).max(0.0),
        }
    }

    /// Maximum offset towards an edge.
    pub fn look(&self, direction: LookDirection) -> PupilOffset {
        match direction {
            LookDirection::Left => PupilOffset { x: -self.max_x, y: 0.0 },
            LookDirection::Right => PupilOffset { x: self.max_x, y: 0.0 },
            LookDirection::Up => PupilOffset { x: 0.0, y: -self.max_y },
            LookDirection::Down => PupilOffset { x: 0.0, y: self.max_y },
        }
    }

    /// Offset that points both pupils from `eyes_center` towards `pointer`.
    ///
    /// Magnitude grows logarithmically with distance and saturates at the
    /// bounds, so nearby movement is visible but far movement stays calm.
    pub fn track(&self, eyes_center: Position, pointer: Position) -> PupilOffset {
        let dx = pointer.x - eyes_center.x;
        let dy = pointer.y - eyes_center.y;
        let angle = dy.atan2(dx);
        let distance = dx.hypot(dy);
        let factor = ((distance / TRACKING_SCALE_PX + 1.0).ln() / 2.0).min(1.0);

        PupilOffset {
            x: angle.cos() * self.max_x * factor,
            y: angle.sin() * self.max_y * factor,
        }
    }
}

/// Independent blink loop and gaze state.
#[derive(Debug, Clone)]
pub struct EyeController {
    mode: EffectiveEyeMode,
    interval: BlinkInterval,
    follow_pointer: bool,
    look: Option<LookDirection>,
    bounds: PupilBounds,
    tracked: PupilOffset,
    blinking: bool,
    timer: Option<TimerId>,
    rng: ChaCha8Rng,
}

impl EyeController {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: EffectiveEyeMode::Normal,
            interval: BlinkInterval::default(),
            follow_pointer: true,
            look: None,
            bounds: PupilBounds::default(),
            tracked: PupilOffset::default(),
            blinking: false,
            timer: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn mode(&self) -> EffectiveEyeMode {
        self.mode
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    pub fn bounds(&self) -> PupilBounds {
        self.bounds
    }

    pub fn look_direction(&self) -> Option<LookDirection> {
        self.look
    }

    /// Switches mode, restarting the blink loop when entering normal mode
    /// and stopping it otherwise. Countdown value changes alone keep the
    /// loop untouched.
    pub fn set_mode(
        &mut self,
        mode: EffectiveEyeMode,
        interval: BlinkInterval,
        scheduler: &mut Scheduler<TimerEvent>,
    ) {
        let same_kind = std::mem::discriminant(&mode) == std::mem::discriminant(&self.mode);
        let interval_changed = interval != self.interval;
        self.mode = mode;
        self.interval = interval;

        if !same_kind || (mode == EffectiveEyeMode::Normal && interval_changed) {
            tracing::debug!(mode = mode.as_str(), "eye mode changed");
            self.stop(scheduler);
        }
        self.start(scheduler);
    }

    /// Begins the blink loop if the controller is in normal mode and idle.
    pub fn start(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        if self.mode == EffectiveEyeMode::Normal && self.timer.is_none() {
            self.schedule_next(scheduler);
        }
    }

    fn schedule_next(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        let delay = self.interval.sample(&mut self.rng);
        tracing::trace!(delay, "next blink scheduled");
        self.timer = Some(scheduler.schedule(delay, TimerEvent::BlinkStart));
    }

    fn stop(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.blinking = false;
    }

    pub fn on_blink_start(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        if self.mode != EffectiveEyeMode::Normal {
            self.timer = None;
            return;
        }
        self.blinking = true;
        self.timer = Some(scheduler.schedule(BLINK_CLOSED_MS, TimerEvent::BlinkEnd));
    }

    /// Reopens the eyes and schedules the following cycle.
    pub fn on_blink_end(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        self.blinking = false;
        self.timer = None;
        if self.mode == EffectiveEyeMode::Normal {
            self.schedule_next(scheduler);
        }
    }

    pub fn set_follow_pointer(&mut self, follow: bool) {
        self.follow_pointer = follow;
        if !follow {
            self.tracked = PupilOffset::default();
        }
    }

    pub fn set_look_direction(&mut self, look: Option<LookDirection>) {
        self.look = look;
    }

    /// Recomputed on resize from the rendered sizes.
    pub fn set_bounds(&mut self, bounds: PupilBounds) {
        self.bounds = bounds;
    }

    /// Updates tracking. Ignored unless the eyes are free to follow.
    pub fn pointer_moved(&mut self, eyes_center: Position, pointer: Position) -> bool {
        if self.mode != EffectiveEyeMode::Normal || !self.follow_pointer || self.look.is_some() {
            return false;
        }
        self.tracked = self.bounds.track(eyes_center, pointer);
        true
    }

    /// Current pupil translation for both eyes.
    pub fn pupil_offset(&self) -> PupilOffset {
        if let Some(look) = self.look {
            return self.bounds.look(look);
        }
        if self.mode != EffectiveEyeMode::Normal || !self.follow_pointer {
            return PupilOffset::default();
        }
        self.tracked
    }

    /// Pupils are replaced by a pulsing glyph while loading.
    pub fn pupils_visible(&self) -> bool {
        self.mode != EffectiveEyeMode::Loading
    }

    /// Digit to overlay across both eyes, if counting down.
    pub fn countdown(&self) -> Option<u32> {
        match self.mode {
            EffectiveEyeMode::Countdown(value) => Some(value),
            _ => None,
        }
    }

    pub fn teardown(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        self.stop(scheduler);
    }
}

/// Rotation keeping the countdown digit upright inside a turned head.
pub fn countdown_rotation(head_rotation: f64) -> f64 {
    -head_rotation
}
