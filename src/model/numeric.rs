//! Bounded numeric fields
//!
//! Numeric inputs are clamped into range, never rejected.

use serde::{Deserialize, Deserializer};

use super::ParseFieldError;

/// Identifier for one numeric preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    /// Root font scale in percent
    FontSize,
    /// Page brightness in percent
    Brightness,
    /// Speech synthesis rate multiplier
    SpeechRate,
    /// Speech and alert volume in percent
    Volume,
}

/// Inclusive range, default and step of a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

/// Direction for `increase`/`decrease`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl NumericField {
    pub const ALL: &'static [NumericField] = &[
        NumericField::FontSize,
        NumericField::Brightness,
        NumericField::SpeechRate,
        NumericField::Volume,
    ];

    pub const fn bounds(self) -> Bounds {
        match self {
            NumericField::FontSize => Bounds {
                min: 70.0,
                max: 200.0,
                default: 100.0,
                step: 10.0,
            },
            NumericField::Brightness => Bounds {
                min: 20.0,
                max: 100.0,
                default: 100.0,
                step: 10.0,
            },
            NumericField::SpeechRate => Bounds {
                min: 0.5,
                max: 2.0,
                default: 1.0,
                step: 0.25,
            },
            NumericField::Volume => Bounds {
                min: 0.0,
                max: 100.0,
                default: 100.0,
                step: 10.0,
            },
        }
    }

    /// Wire key used in cached and remote snapshots
    pub const fn key(self) -> &'static str {
        match self {
            NumericField::FontSize => "fontSize",
            NumericField::Brightness => "brightness",
            NumericField::SpeechRate => "speechRate",
            NumericField::Volume => "volume",
        }
    }

    pub fn from_key(key: &str) -> Result<Self, ParseFieldError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .ok_or_else(|| ParseFieldError::UnknownField(key.to_string()))
    }

    /// Clamp `value` into range. NaN maps to the field default.
    pub fn clamp(self, value: f64) -> f64 {
        let bounds = self.bounds();
        if value.is_nan() {
            return bounds.default;
        }
        value.clamp(bounds.min, bounds.max)
    }

    pub fn is_valid(self, value: f64) -> bool {
        let bounds = self.bounds();
        !value.is_nan() && value >= bounds.min && value <= bounds.max
    }

    /// Next value one step away from `current`, clamped
    pub fn stepped(self, current: f64, direction: StepDirection) -> f64 {
        let step = self.bounds().step;
        match direction {
            StepDirection::Up => self.clamp(current + step),
            StepDirection::Down => self.clamp(current - step),
        }
    }
}

impl std::str::FromStr for StepDirection {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "increase" | "+" => Ok(Self::Up),
            "down" | "decrease" | "-" => Ok(Self::Down),
            _ => Err(ParseFieldError::InvalidValue {
                field: "direction",
                value: s.to_string(),
            }),
        }
    }
}

// Lenient deserializers: any JSON number is accepted and clamped, so a stale
// snapshot with an out-of-range value still loads.

pub(crate) fn de_font_size<'de, D: Deserializer<'de>>(d: D) -> Result<u16, D::Error> {
    let raw = f64::deserialize(d)?;
    Ok(NumericField::FontSize.clamp(raw).round() as u16)
}

pub(crate) fn de_brightness<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(d)?;
    Ok(NumericField::Brightness.clamp(raw).round() as u8)
}

pub(crate) fn de_speech_rate<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    let raw = f64::deserialize(d)?;
    Ok(NumericField::SpeechRate.clamp(raw) as f32)
}

pub(crate) fn de_volume<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(d)?;
    Ok(NumericField::Volume.clamp(raw).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_font_size() {
        let f = NumericField::FontSize;
        assert_eq!(f.clamp(10.0), 70.0);
        assert_eq!(f.clamp(500.0), 200.0);
        assert_eq!(f.clamp(130.0), 130.0);
        assert_eq!(f.clamp(f64::NAN), 100.0);
        assert_eq!(f.clamp(f64::NEG_INFINITY), 70.0);
    }

    #[test]
    fn test_repeated_steps_never_leave_bounds() {
        for &field in NumericField::ALL {
            let bounds = field.bounds();
            let mut value = bounds.default;
            for _ in 0..100 {
                value = field.stepped(value, StepDirection::Up);
                assert!(value <= bounds.max);
            }
            assert_eq!(value, bounds.max);
            for _ in 0..100 {
                value = field.stepped(value, StepDirection::Down);
                assert!(value >= bounds.min);
            }
            assert_eq!(value, bounds.min);
        }
    }

    #[test]
    fn test_speech_rate_steps_by_quarter() {
        let f = NumericField::SpeechRate;
        assert_eq!(f.stepped(1.0, StepDirection::Up), 1.25);
        assert_eq!(f.stepped(0.5, StepDirection::Down), 0.5);
    }

    #[test]
    fn test_defaults_are_valid() {
        for &field in NumericField::ALL {
            assert!(field.is_valid(field.bounds().default), "{}", field.key());
        }
    }

    #[test]
    fn test_step_direction_parse() {
        assert_eq!("up".parse::<StepDirection>().unwrap(), StepDirection::Up);
        assert_eq!(
            "Decrease".parse::<StepDirection>().unwrap(),
            StepDirection::Down
        );
        assert!("sideways".parse::<StepDirection>().is_err());
    }
}
