//! Position-derived tilt, shadow and paper direction.
//!
//! Everything here is a pure function of the widget position and the
//! viewport size, recomputed on every render.

use serde::{Deserialize, Serialize};

/// Maximum tilt in degrees at strength 1.
pub const MAX_TILT_DEG: f64 = 12.0;

/// Minimum shadow offset per axis in pixels.
pub const MIN_SHADOW_PX: f64 = 4.0;

/// Shadow pixels per degree of tilt at strength 1.
const SHADOW_PER_DEG: f64 = 0.5;

/// Widget center in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Browser viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half of the viewport diagonal: the farthest a point inside the
    /// viewport can be from its center.
    pub fn half_diagonal(&self) -> f64 {
        let center = self.center();
        center.x.hypot(center.y)
    }

    /// Position used when the host does not supply one: near the
    /// bottom-right corner.
    pub fn default_position(&self) -> Position {
        Position::new(self.width - 100.0, self.height - 100.0)
    }
}

/// Simulated 3-D rotation in degrees.
///
/// `tilt_x` rotates about the horizontal axis, `tilt_y` about the vertical.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    pub tilt_x: f64,
    pub tilt_y: f64,
}

/// Drop-shadow offset in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShadowOffset {
    pub x: f64,
    pub y: f64,
}

/// Side the paper slides out towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperDirection {
    Left,
    Right,
}

impl PaperDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Head rotation for the flip: clockwise when printing left,
    /// counter-clockwise when printing right.
    pub fn rotate_degrees(&self) -> f64 {
        match self {
            Self::Left => 90.0,
            Self::Right => -90.0,
        }
    }

    /// CSS property that anchored overlays are offset along.
    pub fn anchor_side(&self) -> &'static str {
        match self {
            Self::Left => "right",
            Self::Right => "left",
        }
    }
}

/// Computes the tilt pointing the widget towards the viewport center.
///
/// A widget to the right of center turns its right side outwards (negative
/// `tilt_y`); a widget below center turns its bottom outwards (positive
/// `tilt_x`). Both axes share one distance factor, so widgets near the
/// center barely tilt.
pub fn calculate_tilt(position: Position, viewport: Viewport, strength: f64) -> Tilt {
    let max_dist = viewport.half_diagonal();
    if max_dist <= 0.0 || !max_dist.is_finite() {
        return Tilt::default();
    }

    let center = viewport.center();
    let offset_x = position.x - center.x;
    let offset_y = position.y - center.y;

    let factor = (offset_x.hypot(offset_y) / max_dist).min(1.0);
    // Off-screen positions would otherwise exceed the cap
    let norm_x = (offset_x / max_dist).clamp(-1.0, 1.0);
    let norm_y = (offset_y / max_dist).clamp(-1.0, 1.0);

    Tilt {
        tilt_x: norm_y * MAX_TILT_DEG * strength * factor,
        tilt_y: -norm_x * MAX_TILT_DEG * strength * factor,
    }
}

/// Computes the shadow cast away from a light source at the viewport center.
///
/// Each axis is pushed out by [`MIN_SHADOW_PX`] in its own direction so the
/// shadow never vanishes. An axis that is exactly zero is treated as
/// positive, so a centered widget shadows down-right.
pub fn shadow_offset(tilt: Tilt, strength: f64) -> ShadowOffset {
    let x = -tilt.tilt_y * SHADOW_PER_DEG * strength;
    let y = tilt.tilt_x * SHADOW_PER_DEG * strength;

    ShadowOffset {
        x: x + sign_or_positive(x) * MIN_SHADOW_PX,
        y: y + sign_or_positive(y) * MIN_SHADOW_PX,
    }
}

fn sign_or_positive(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        1.0
    } else {
        value.signum()
    }
}

/// Paper extends towards the half of the screen with more room.
pub fn paper_direction(position: Position, viewport: Viewport) -> PaperDirection {
    if position.x > viewport.width / 2.0 {
        PaperDirection::Left
    } else {
        PaperDirection::Right
    }
}

/// All position-derived values for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub tilt: Tilt,
    pub shadow: ShadowOffset,
    pub direction: PaperDirection,
    pub rotate_degrees: f64,
}

impl Geometry {
    pub fn derive(
        position: Position,
        viewport: Viewport,
        tilt_strength: f64,
        shadow_strength: f64,
    ) -> Self {
        let tilt = calculate_tilt(position, viewport, tilt_strength);
        let direction = paper_direction(position, viewport);
        Self {
            tilt,
            shadow: shadow_offset(tilt, shadow_strength),
            direction,
            rotate_degrees: direction.rotate_degrees(),
        }
    }
}
