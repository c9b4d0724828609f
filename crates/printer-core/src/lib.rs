//! Robot Printer Core Library
//!
//! Renderer-independent state machines for the robot printer widget: the
//! open/close animation sequence, click/drag disambiguation, position-driven
//! tilt and shadow, eye behavior and mouth anchoring.
//!
//! All timers run on one virtual clock ([`timer::Scheduler`]) so the whole
//! widget can be fast-forwarded deterministically in tests. The browser
//! frontend maps wall-clock time onto it.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod anchor;
pub mod config;
pub mod drag;
pub mod eye;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod result;
pub mod sequencer;
pub mod timer;
pub mod widget;

pub use anchor::{AnchorSync, MouthState, Rect};
pub use config::{AntennaColor, ConfigError, PrinterConfig};
pub use drag::{DragController, DragRelease, OverlayRegion, PointerTarget};
pub use eye::{
    BlinkInterval, EffectiveEyeMode, EyeController, EyeMode, LookDirection, PupilBounds,
    PupilOffset,
};
pub use geometry::{Geometry, PaperDirection, Position, ShadowOffset, Tilt, Viewport};
pub use input::{PaperInput, SubmitGate};
pub use menu::{ActionMenuState, ActionOutcome, ActionPath, ActionSpec};
pub use result::ResultPanelState;
pub use sequencer::{AnimationPhase, AnimationSequencer, SequencerTimings};
pub use timer::{Millis, Scheduler, TimerEvent};
pub use widget::{EyeView, PrinterWidget, WidgetEvent, WidgetView};
