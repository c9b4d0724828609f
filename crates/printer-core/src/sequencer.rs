//! Open/close choreography as an explicit state machine.
//!
//! ```text
//! idle --(toggle)--> rotating --[T1]--> mouth-opening --[T2]--> paper-out --[T3]--> expanded
//! expanded --(toggle)--> paper-in --[T4]--> mouth-closing --[T5]--> rotating-back --[T6]--> idle
//! ```
//!
//! Timed successors and dwell times live in one table ([`AnimationPhase::transition`]).
//! Only `idle` and `expanded` accept input; every other phase advances on its
//! own timer and ignores `toggle`.

use serde::{Deserialize, Serialize};

use crate::timer::{Millis, Scheduler, TimerEvent, TimerId};

/// Mouth opening dwell (T2).
pub const MOUTH_OPEN_MS: Millis = 300;

/// Mouth closing dwell (T5).
pub const MOUTH_CLOSE_MS: Millis = 200;

/// Paper retracts faster than it extends.
const PAPER_IN_RATIO: f64 = 0.8;

/// One discrete state of the open/close sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationPhase {
    #[default]
    Idle,
    Rotating,
    MouthOpening,
    PaperOut,
    Expanded,
    PaperIn,
    MouthClosing,
    RotatingBack,
}

/// How long a phase lasts before advancing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dwell {
    Rotate,
    Fixed(Millis),
    Paper,
    PaperIn,
}

impl AnimationPhase {
    pub const ALL: [AnimationPhase; 8] = [
        Self::Idle,
        Self::Rotating,
        Self::MouthOpening,
        Self::PaperOut,
        Self::Expanded,
        Self::PaperIn,
        Self::MouthClosing,
        Self::RotatingBack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rotating => "rotating",
            Self::MouthOpening => "mouth-opening",
            Self::PaperOut => "paper-out",
            Self::Expanded => "expanded",
            Self::PaperIn => "paper-in",
            Self::MouthClosing => "mouth-closing",
            Self::RotatingBack => "rotating-back",
        }
    }

    /// Timed transition table: the dwell of this phase and the phase that
    /// follows it. `None` for phases that wait for input.
    fn transition(self) -> Option<(Dwell, AnimationPhase)> {
        match self {
            Self::Idle | Self::Expanded => None,
            Self::Rotating => Some((Dwell::Rotate, Self::MouthOpening)),
            Self::MouthOpening => Some((Dwell::Fixed(MOUTH_OPEN_MS), Self::PaperOut)),
            Self::PaperOut => Some((Dwell::Paper, Self::Expanded)),
            Self::PaperIn => Some((Dwell::PaperIn, Self::MouthClosing)),
            Self::MouthClosing => Some((Dwell::Fixed(MOUTH_CLOSE_MS), Self::RotatingBack)),
            Self::RotatingBack => Some((Dwell::Rotate, Self::Idle)),
        }
    }

    /// Phase entered when `toggle` is accepted.
    fn toggled(self) -> Option<AnimationPhase> {
        match self {
            Self::Idle => Some(Self::Rotating),
            Self::Expanded => Some(Self::PaperIn),
            _ => None,
        }
    }

    /// The timed successor of this phase.
    pub fn next(self) -> Option<AnimationPhase> {
        self.transition().map(|(_, next)| next)
    }

    pub fn is_paper_visible(&self) -> bool {
        matches!(self, Self::PaperOut | Self::Expanded)
    }

    pub fn is_mouth_open(&self) -> bool {
        matches!(
            self,
            Self::MouthOpening | Self::PaperOut | Self::Expanded | Self::PaperIn
        )
    }

    pub fn is_rotated(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether the head's rotation transform is applied. Drops during
    /// `rotating-back` so the CSS transition can play towards upright.
    pub fn is_head_turned(&self) -> bool {
        self.is_rotated() && *self != Self::RotatingBack
    }
}

impl std::fmt::Display for AnimationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configurable durations. The fixed mouth timings are constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerTimings {
    /// T1 and T6.
    pub rotate_duration: Millis,
    /// T3; T4 is 80% of it.
    pub paper_duration: Millis,
}

impl Default for SequencerTimings {
    fn default() -> Self {
        Self {
            rotate_duration: 400,
            paper_duration: 600,
        }
    }
}

impl SequencerTimings {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn dwell(&self, dwell: Dwell) -> Millis {
        match dwell {
            Dwell::Rotate => self.rotate_duration,
            Dwell::Fixed(ms) => ms,
            Dwell::Paper => self.paper_duration,
            Dwell::PaperIn => (self.paper_duration as f64 * PAPER_IN_RATIO).round() as Millis,
        }
    }
}

/// Side effect requested by a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEffect {
    /// The paper is fully out; the text input should take focus.
    FocusInput,
}

/// Drives [`AnimationPhase`] through the transition table.
#[derive(Debug, Clone, Default)]
pub struct AnimationSequencer {
    phase: AnimationPhase,
    timings: SequencerTimings,
    pending: Option<TimerId>,
}

impl AnimationSequencer {
    pub fn new(timings: SequencerTimings) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            timings,
            pending: None,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn timings(&self) -> SequencerTimings {
        self.timings
    }

    /// Applies from the next scheduled transition; a timer already in flight
    /// keeps its deadline.
    pub fn set_timings(&mut self, timings: SequencerTimings) {
        self.timings = timings;
    }

    /// Starts expanding from `idle` or collapsing from `expanded`.
    ///
    /// Ignored mid-sequence and while `loading`; nothing is queued. Returns
    /// true if a sequence started.
    pub fn toggle(&mut self, loading: bool, scheduler: &mut Scheduler<TimerEvent>) -> bool {
        if loading {
            tracing::debug!(phase = %self.phase, "toggle ignored while loading");
            return false;
        }
        let Some(next) = self.phase.toggled() else {
            tracing::debug!(phase = %self.phase, "toggle ignored mid-sequence");
            return false;
        };
        self.enter(next, scheduler);
        true
    }

    /// Handles a [`TimerEvent::PhaseElapsed`]. Events whose source phase is
    /// no longer current are dropped.
    pub fn on_phase_elapsed(
        &mut self,
        from: AnimationPhase,
        scheduler: &mut Scheduler<TimerEvent>,
    ) -> Option<SequencerEffect> {
        if from != self.phase {
            tracing::trace!(from = %from, phase = %self.phase, "stale phase timer");
            return None;
        }
        self.pending = None;
        let next = self.phase.next()?;
        self.enter(next, scheduler);

        (next == AnimationPhase::Expanded).then_some(SequencerEffect::FocusInput)
    }

    fn enter(&mut self, phase: AnimationPhase, scheduler: &mut Scheduler<TimerEvent>) {
        tracing::debug!(from = %self.phase, to = %phase, at = scheduler.now(), "phase transition");
        self.phase = phase;
        if let Some((dwell, _)) = phase.transition() {
            let delay = self.timings.dwell(dwell);
            let event = TimerEvent::PhaseElapsed { from: phase };
            self.pending = Some(scheduler.schedule(delay, event));
        }
    }

    /// Cancels any timer in flight and returns to `idle`. Safe to repeat.
    pub fn teardown(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        self.phase = AnimationPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the scheduler up to `until`, collecting every phase entered.
    fn run_until(
        sequencer: &mut AnimationSequencer,
        scheduler: &mut Scheduler<TimerEvent>,
        until: Millis,
        seen: &mut Vec<AnimationPhase>,
        effects: &mut Vec<(Millis, SequencerEffect)>,
    ) {
        while let Some((at, event)) = scheduler.pop_due(until) {
            if let TimerEvent::PhaseElapsed { from } = event {
                let effect = sequencer.on_phase_elapsed(from, scheduler);
                seen.push(sequencer.phase());
                if let Some(effect) = effect {
                    effects.push((at, effect));
                }
            }
        }
        scheduler.advance_to(until);
    }

    #[test]
    fn test_full_cycle_phase_order() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();
        let mut seen = vec![sequencer.phase()];
        let mut effects = Vec::new();

        assert!(sequencer.toggle(false, &mut scheduler));
        seen.push(sequencer.phase());
        run_until(&mut sequencer, &mut scheduler, 5_000, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::Expanded);

        assert!(sequencer.toggle(false, &mut scheduler));
        seen.push(sequencer.phase());
        run_until(&mut sequencer, &mut scheduler, 10_000, &mut seen, &mut effects);

        assert_eq!(
            seen,
            vec![
                AnimationPhase::Idle,
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
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_focus_after_full_expand() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::new(SequencerTimings {
            rotate_duration: 400,
            paper_duration: 600,
        });
        let mut seen = Vec::new();
        let mut effects = Vec::new();

        sequencer.toggle(false, &mut scheduler);
        run_until(&mut sequencer, &mut scheduler, 1_299, &mut seen, &mut effects);
        assert!(effects.is_empty());
        assert_eq!(sequencer.phase(), AnimationPhase::PaperOut);

        run_until(&mut sequencer, &mut scheduler, 1_300, &mut seen, &mut effects);
        assert_eq!(effects, vec![(1_300, SequencerEffect::FocusInput)]);
    }

    #[test]
    fn test_collapse_timings() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::new(SequencerTimings {
            rotate_duration: 100,
            paper_duration: 500,
        });
        let mut seen = Vec::new();
        let mut effects = Vec::new();

        sequencer.toggle(false, &mut scheduler);
        run_until(&mut sequencer, &mut scheduler, 900, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::Expanded);

        sequencer.toggle(false, &mut scheduler);
        // T4 = 400
        run_until(&mut sequencer, &mut scheduler, 1_299, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::PaperIn);
        run_until(&mut sequencer, &mut scheduler, 1_300, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::MouthClosing);
        // T5 = 200
        run_until(&mut sequencer, &mut scheduler, 1_500, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::RotatingBack);
        // T6 = 100
        run_until(&mut sequencer, &mut scheduler, 1_600, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_new_timings_apply_from_next_transition() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();
        let mut seen = Vec::new();
        let mut effects = Vec::new();

        sequencer.toggle(false, &mut scheduler);
        sequencer.set_timings(SequencerTimings {
            rotate_duration: 100,
            paper_duration: 200,
        });
        // The rotation already in flight keeps its 400 ms deadline
        run_until(&mut sequencer, &mut scheduler, 399, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::Rotating);
        run_until(&mut sequencer, &mut scheduler, 400, &mut seen, &mut effects);
        assert_eq!(sequencer.phase(), AnimationPhase::MouthOpening);

        // 400 + 300 + 200
        run_until(&mut sequencer, &mut scheduler, 899, &mut seen, &mut effects);
        assert!(effects.is_empty());
        run_until(&mut sequencer, &mut scheduler, 900, &mut seen, &mut effects);
        assert_eq!(effects, vec![(900, SequencerEffect::FocusInput)]);
    }

    #[test]
    fn test_double_toggle_runs_one_sequence() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();

        assert!(sequencer.toggle(false, &mut scheduler));
        assert!(!sequencer.toggle(false, &mut scheduler));
        assert_eq!(scheduler.len(), 1);

        let mut seen = Vec::new();
        let mut effects = Vec::new();
        run_until(&mut sequencer, &mut scheduler, 10_000, &mut seen, &mut effects);
        assert_eq!(effects.len(), 1);
        assert_eq!(sequencer.phase(), AnimationPhase::Expanded);
    }

    #[test]
    fn test_toggle_blocked_while_loading() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();
        assert!(!sequencer.toggle(true, &mut scheduler));
        assert_eq!(sequencer.phase(), AnimationPhase::Idle);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();
        sequencer.toggle(false, &mut scheduler);

        let effect = sequencer.on_phase_elapsed(AnimationPhase::PaperOut, &mut scheduler);
        assert_eq!(effect, None);
        assert_eq!(sequencer.phase(), AnimationPhase::Rotating);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let mut sequencer = AnimationSequencer::default();
        sequencer.toggle(false, &mut scheduler);

        sequencer.teardown(&mut scheduler);
        sequencer.teardown(&mut scheduler);
        assert!(scheduler.is_empty());
        assert_eq!(sequencer.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_projections_per_phase() {
        for phase in AnimationPhase::ALL {
            assert_eq!(
                phase.is_paper_visible(),
                matches!(phase, AnimationPhase::PaperOut | AnimationPhase::Expanded),
                "{phase}"
            );
            // Mouth never open without the head turned
            if phase.is_mouth_open() {
                assert!(phase.is_rotated(), "{phase}");
            }
            // Paper never out without the mouth open
            if phase.is_paper_visible() {
                assert!(phase.is_mouth_open(), "{phase}");
            }
        }
        assert!(!AnimationPhase::Idle.is_rotated());
        assert!(AnimationPhase::RotatingBack.is_rotated());
        assert!(!AnimationPhase::MouthClosing.is_mouth_open());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AnimationPhase::MouthOpening).unwrap();
        assert_eq!(json, "\"mouth-opening\"");
        for phase in AnimationPhase::ALL {
            assert_eq!(serde_json::to_string(&phase).unwrap(), format!("\"{}\"", phase.as_str()));
        }
    }
}
