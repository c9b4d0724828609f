//! Host-facing widget configuration.

use serde::{Deserialize, Serialize};

use crate::eye::{BlinkInterval, EyeMode};
use crate::geometry::{Position, Viewport};
use crate::sequencer::SequencerTimings;
use crate::timer::Millis;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(String),
    #[error("{field} must be a finite, non-negative number, got {value}")]
    Strength { field: &'static str, value: f64 },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("blink interval min {min} exceeds max {max}")]
    BlinkInterval { min: Millis, max: Millis },
    #[error("paper width must be positive, got {0}")]
    PaperWidth(f64),
    #[error("default position must be finite")]
    Position,
}

/// Ball color: one CSS color or a list blended as a radial gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AntennaColor {
    Solid(String),
    Gradient(Vec<String>),
}

impl Default for AntennaColor {
    fn default() -> Self {
        Self::Gradient(vec![
            "#ff6b6b".to_string(),
            "#e74c3c".to_string(),
            "#c0392b".to_string(),
        ])
    }
}

impl AntennaColor {
    /// CSS `background` value for the ball.
    pub fn css_background(&self) -> String {
        match self {
            Self::Solid(color) => color.clone(),
            Self::Gradient(colors) => {
                format!("radial-gradient(circle at 30% 30%, {})", colors.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    pub placeholder: String,
    pub default_value: String,
    /// Paper strip width in pixels.
    pub paper_width: f64,
    pub antenna_color: AntennaColor,
    pub eye_mode: EyeMode,
    /// Pupils track the pointer in normal mode.
    pub follow_pointer: bool,
    pub rotate_duration: Millis,
    pub paper_duration: Millis,
    /// Fixed positioning plus click/drag disambiguation.
    pub draggable: bool,
    /// Initial center when draggable. Defaults to near the bottom-right.
    pub default_position: Option<Position>,
    /// 0 disables tilt, 1 reaches the 12° cap at the corners.
    pub tilt_strength: f64,
    pub shadow_strength: f64,
    pub show_hint: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            placeholder: "Type a note...".to_string(),
            default_value: String::new(),
            paper_width: 500.0,
            antenna_color: AntennaColor::default(),
            eye_mode: EyeMode::default(),
            follow_pointer: true,
            rotate_duration: 400,
            paper_duration: 600,
            draggable: false,
            default_position: None,
            tilt_strength: 1.0,
            shadow_strength: 1.0,
            show_hint: true,
        }
    }
}

impl PrinterConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tilt_strength", self.tilt_strength),
            ("shadow_strength", self.shadow_strength),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Strength { field, value });
            }
        }
        if self.rotate_duration == 0 {
            return Err(ConfigError::ZeroDuration("rotate_duration"));
        }
        if self.paper_duration == 0 {
            return Err(ConfigError::ZeroDuration("paper_duration"));
        }
        if let Some(BlinkInterval { min, max }) = self.eye_mode.blink_interval() {
            if min > max {
                return Err(ConfigError::BlinkInterval { min, max });
            }
        }
        if !self.paper_width.is_finite() || self.paper_width <= 0.0 {
            return Err(ConfigError::PaperWidth(self.paper_width));
        }
        if let Some(position) = self.default_position {
            if !position.x.is_finite() || !position.y.is_finite() {
                return Err(ConfigError::Position);
            }
        }
        Ok(())
    }

    pub fn timings(&self) -> SequencerTimings {
        SequencerTimings {
            rotate_duration: self.rotate_duration,
            paper_duration: self.paper_duration,
        }
    }

    /// Starting position for the given viewport.
    pub fn initial_position(&self, viewport: Viewport) -> Position {
        self.default_position
            .unwrap_or_else(|| viewport.default_position())
    }

    /// Caption under the robot.
    pub fn hint_text(&self) -> Option<&'static str> {
        if !self.show_hint {
            return None;
        }
        Some(if self.draggable {
            "Drag to move / click to open"
        } else {
            "Click the robot to open / close"
        })
    }
}
