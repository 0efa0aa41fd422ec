//! Live-editable roll and ground parameters
//!
//! The control panel's sliders and color picker write `DiceParams` through
//! `set_value` / `set_color` and then emit `ParamsChanged`; the systems that
//! care (ground texture) react to it. Throw parameters are read at trigger
//! time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dice3d::textures::parse_color;

/// Environment variable holding a RON `DiceParams` document (native only).
pub const PARAMS_ENV_VAR: &str = "DIE_ROLLER_PARAMS";

/// Which parameter a control edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamField {
    SquareSize,
    Color1,
    Color2,
    RotationSpeed,
    ThrowForce,
}

impl ParamField {
    pub fn label(&self) -> &'static str {
        match self {
            ParamField::SquareSize => "Square Size",
            ParamField::Color1 => "Color 1",
            ParamField::Color2 => "Color 2",
            ParamField::RotationSpeed => "Rotation Speed",
            ParamField::ThrowForce => "Throw Force",
        }
    }

    /// Ground fields require the checkerboard texture to be regenerated.
    pub fn affects_ground(&self) -> bool {
        matches!(
            self,
            ParamField::SquareSize | ParamField::Color1 | ParamField::Color2
        )
    }
}

/// Emitted by the presentation layer after it changed a parameter.
#[derive(Message, Clone, Copy, Debug)]
pub struct ParamsChanged {
    pub field: ParamField,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceParams {
    /// Checkerboard square size in texels of the 256x256 ground texture.
    pub square_size: u32,
    pub color1: String,
    pub color2: String,
    /// Multiplier on the random torque applied at throw time.
    pub rotation_speed: f32,
    /// Multiplier on the random impulse applied at throw time.
    pub throw_force: f32,
}

impl Default for DiceParams {
    fn default() -> Self {
        Self {
            square_size: 128,
            color1: String::from("#444444"),
            color2: String::from("#888888"),
            rotation_speed: 1.0,
            throw_force: 1.0,
        }
    }
}

impl DiceParams {
    pub const SQUARE_SIZE_MIN: u32 = 8;
    pub const SQUARE_SIZE_MAX: u32 = 256;
    pub const SQUARE_SIZE_STEP: u32 = 1;

    pub const ROTATION_SPEED_MIN: f32 = 0.01;
    pub const ROTATION_SPEED_MAX: f32 = 5.0;
    pub const ROTATION_SPEED_STEP: f32 = 0.01;

    pub const THROW_FORCE_MIN: f32 = 0.1;
    pub const THROW_FORCE_MAX: f32 = 10.0;
    pub const THROW_FORCE_STEP: f32 = 0.1;

    /// Pull every numeric field back inside its bounds.
    pub fn clamped(mut self) -> Self {
        self.square_size = self
            .square_size
            .clamp(Self::SQUARE_SIZE_MIN, Self::SQUARE_SIZE_MAX);
        self.rotation_speed = clamp_finite(
            self.rotation_speed,
            Self::ROTATION_SPEED_MIN,
            Self::ROTATION_SPEED_MAX,
        );
        self.throw_force =
            clamp_finite(self.throw_force, Self::THROW_FORCE_MIN, Self::THROW_FORCE_MAX);
        self
    }

    pub fn from_ron(source: &str) -> Result<Self, String> {
        let params: DiceParams =
            ron::from_str(source).map_err(|e| format!("Invalid dice parameters: {}", e))?;
        Ok(params.clamped())
    }

    /// Parameters from `DIE_ROLLER_PARAMS`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var(PARAMS_ENV_VAR) {
            Ok(source) => Self::from_ron(&source),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Slider bounds and step of a numeric field, `None` for colors.
    pub fn slider_range(field: ParamField) -> Option<(f32, f32, f32)> {
        match field {
            ParamField::SquareSize => Some((
                Self::SQUARE_SIZE_MIN as f32,
                Self::SQUARE_SIZE_MAX as f32,
                Self::SQUARE_SIZE_STEP as f32,
            )),
            ParamField::RotationSpeed => Some((
                Self::ROTATION_SPEED_MIN,
                Self::ROTATION_SPEED_MAX,
                Self::ROTATION_SPEED_STEP,
            )),
            ParamField::ThrowForce => Some((
                Self::THROW_FORCE_MIN,
                Self::THROW_FORCE_MAX,
                Self::THROW_FORCE_STEP,
            )),
            ParamField::Color1 | ParamField::Color2 => None,
        }
    }

    pub fn numeric_value(&self, field: ParamField) -> Option<f32> {
        match field {
            ParamField::SquareSize => Some(self.square_size as f32),
            ParamField::RotationSpeed => Some(self.rotation_speed),
            ParamField::ThrowForce => Some(self.throw_force),
            ParamField::Color1 | ParamField::Color2 => None,
        }
    }

    /// Set a numeric field from a slider position, snapped to its step and
    /// clamped to its bounds. Returns whether the stored value changed.
    pub fn set_value(&mut self, field: ParamField, value: f32) -> bool {
        let Some((min, max, step)) = Self::slider_range(field) else {
            return false;
        };
        let snapped = snap_to_step(value, step, min, max);
        match field {
            ParamField::SquareSize => {
                let size = snapped.round() as u32;
                let changed = size != self.square_size;
                self.square_size = size;
                changed
            }
            ParamField::RotationSpeed => replace_f32(&mut self.rotation_speed, snapped),
            ParamField::ThrowForce => replace_f32(&mut self.throw_force, snapped),
            ParamField::Color1 | ParamField::Color2 => false,
        }
    }

    pub fn color(&self, field: ParamField) -> Option<&str> {
        match field {
            ParamField::Color1 => Some(&self.color1),
            ParamField::Color2 => Some(&self.color2),
            _ => None,
        }
    }

    /// Set a ground color from any CSS color string. The stored value is
    /// normalized to `#rrggbb`. Returns whether the stored value changed.
    pub fn set_color(&mut self, field: ParamField, color: &str) -> Result<bool, String> {
        let [r, g, b, _] = parse_color(color)?;
        let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
        let slot = match field {
            ParamField::Color1 => &mut self.color1,
            ParamField::Color2 => &mut self.color2,
            other => return Err(format!("{} is not a color", other.label())),
        };
        let changed = !slot.eq_ignore_ascii_case(&hex);
        *slot = hex;
        Ok(changed)
    }

    /// Display text for one field.
    pub fn display(&self, field: ParamField) -> String {
        match field {
            ParamField::SquareSize => self.square_size.to_string(),
            ParamField::Color1 => self.color1.clone(),
            ParamField::Color2 => self.color2.clone(),
            ParamField::RotationSpeed => format!("{:.2}", self.rotation_speed),
            ParamField::ThrowForce => format!("{:.1}", self.throw_force),
        }
    }
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

/// Round to the nearest multiple of `step`, clamp.
fn snap_to_step(value: f32, step: f32, min: f32, max: f32) -> f32 {
    clamp_finite((value / step).round() * step, min, max)
}

fn replace_f32(slot: &mut f32, value: f32) -> bool {
    let changed = (*slot - value).abs() > f32::EPSILON;
    *slot = value;
    changed
}
