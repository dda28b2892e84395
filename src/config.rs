//! Declarative eye configuration. One `EyeConfig` captures everything the
//! setter surface can change, so a page can ship its look as JSON and apply it
//! in one call.

use crate::animator::{
    AUTOBLINK_INTERVAL_S, AUTOBLINK_VARIATION_S, DEFAULT_CORNER_RADIUS, DEFAULT_EYE_SIZE,
    DEFAULT_FRAME_RATE, DEFAULT_SCREEN_SIZE, DEFAULT_SPACING, EyeAnimator, H_FLICKER_AMPLITUDE,
    IDLE_INTERVAL_S, IDLE_VARIATION_S, V_FLICKER_AMPLITUDE,
};
use crate::color::Color;
use crate::error::{EyesError, Result};
use crate::mood::Mood;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    pub enabled: bool,
    pub interval_s: f64,
    pub variation_s: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlickerConfig {
    pub enabled: bool,
    pub amplitude: f64,
}

/// Per-eye geometry in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EyeShape {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl Default for EyeShape {
    fn default() -> Self {
        Self { width: DEFAULT_EYE_SIZE, height: DEFAULT_EYE_SIZE, radius: DEFAULT_CORNER_RADIUS }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EyeConfig {
    pub width: f64,
    pub height: f64,
    pub frame_rate: f64,
    pub background: Color,
    pub main: Color,
    pub tear: Option<Color>,
    pub left: EyeShape,
    pub right: EyeShape,
    pub spacing: f64,
    pub mood: Mood,
    pub curious: bool,
    pub cyclops: bool,
    pub sweat: bool,
    pub watery: bool,
    pub auto_blink: Schedule,
    pub idle: Schedule,
    pub horizontal_flicker: FlickerConfig,
    pub vertical_flicker: FlickerConfig,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_SIZE,
            height: DEFAULT_SCREEN_SIZE,
            frame_rate: DEFAULT_FRAME_RATE,
            background: Color::BACKGROUND,
            main: Color::MAIN,
            tear: None,
            left: EyeShape::default(),
            right: EyeShape::default(),
            spacing: DEFAULT_SPACING,
            mood: Mood::Default,
            curious: false,
            cyclops: false,
            sweat: false,
            watery: false,
            auto_blink: Schedule {
                enabled: false,
                interval_s: AUTOBLINK_INTERVAL_S,
                variation_s: AUTOBLINK_VARIATION_S,
            },
            idle: Schedule { enabled: false, interval_s: IDLE_INTERVAL_S, variation_s: IDLE_VARIATION_S },
            horizontal_flicker: FlickerConfig { enabled: false, amplitude: H_FLICKER_AMPLITUDE },
            vertical_flicker: FlickerConfig { enabled: false, amplitude: V_FLICKER_AMPLITUDE },
        }
    }
}

impl EyeConfig {
    /// Surface size and frame rate must be finite and positive; geometry and
    /// timer values must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("width", self.width), ("height", self.height), ("frame_rate", self.frame_rate)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(EyesError::invalid(format!("{name} must be > 0, got {v}")));
            }
        }
        let non_negative = [
            ("left.width", self.left.width),
            ("left.height", self.left.height),
            ("left.radius", self.left.radius),
            ("right.width", self.right.width),
            ("right.height", self.right.height),
            ("right.radius", self.right.radius),
            ("spacing", self.spacing),
            ("auto_blink.interval_s", self.auto_blink.interval_s),
            ("auto_blink.variation_s", self.auto_blink.variation_s),
            ("idle.interval_s", self.idle.interval_s),
            ("idle.variation_s", self.idle.variation_s),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(EyesError::invalid(format!("{name} must be >= 0, got {v}")));
            }
        }
        Ok(())
    }

    /// Validate, then push every field through the animator's setters and
    /// re-initialize so the new geometry is centered immediately.
    pub fn apply<S: Surface>(&self, eyes: &mut EyeAnimator<S>) -> Result<()> {
        self.validate()?;
        eyes.set_display_colors(self.background, self.main);
        eyes.set_tear_color(self.tear);
        eyes.set_eye_size(self.left.width, self.right.width);
        eyes.set_eye_height(self.left.height, self.right.height);
        eyes.set_corner_radius(self.left.radius, self.right.radius);
        eyes.set_spacing(self.spacing);
        eyes.initialize(self.width, self.height, self.frame_rate)?;
        eyes.set_mood(self.mood);
        eyes.set_curious(self.curious);
        eyes.set_cyclops(self.cyclops);
        eyes.set_sweat(self.sweat);
        eyes.set_watery_eyes(self.watery);
        let Schedule { enabled, interval_s, variation_s } = self.auto_blink;
        eyes.set_auto_blink(enabled, interval_s, variation_s);
        let Schedule { enabled, interval_s, variation_s } = self.idle;
        eyes.set_idle_wander(enabled, interval_s, variation_s);
        eyes.set_horizontal_flicker(self.horizontal_flicker.enabled, self.horizontal_flicker.amplitude);
        eyes.set_vertical_flicker(self.vertical_flicker.enabled, self.vertical_flicker.amplitude);
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EyeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
