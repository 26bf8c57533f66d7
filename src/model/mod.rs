//! Accessibility configuration model
//!
//! `A11yConfig` is the single aggregate record the engine owns. It is always
//! fully populated: deserialization backfills missing keys from defaults,
//! ignores unknown keys and clamps numeric values into range.

mod choices;
mod fields;
mod numeric;

pub use choices::{
    Choice, ChoiceField, ClickDelay, ColorBlindFilter, ContrastTheme, CursorColor, FontFamily,
    Saturation, Spacing,
};
pub use fields::{ToggleField, Toggles};
pub use numeric::{Bounds, NumericField, StepDirection};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::profiles::{self, ProfileId};

/// Error for string-driven field access (CLI input, remote keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFieldError {
    /// No field with this name exists
    UnknownField(String),
    /// The field exists but the value is not one of its members
    InvalidValue { field: &'static str, value: String },
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "Unknown field: {}", name),
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid value for {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ParseFieldError {}

/// The complete accessibility preference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct A11yConfig {
    /// Label of the last activated profile. Individual field edits do not
    /// clear it, so it can drift from the actual field values.
    #[serde(with = "profiles::label")]
    pub active_profile: Option<ProfileId>,

    #[serde(flatten)]
    pub toggles: Toggles,

    pub contrast_theme: ContrastTheme,
    pub color_blind_filter: ColorBlindFilter,
    pub saturation: Saturation,
    pub cursor_color: CursorColor,
    pub font_family: FontFamily,
    pub spacing: Spacing,
    pub click_delay: ClickDelay,

    #[serde(deserialize_with = "numeric::de_font_size")]
    pub font_size: u16,
    #[serde(deserialize_with = "numeric::de_brightness")]
    pub brightness: u8,
    #[serde(deserialize_with = "numeric::de_speech_rate")]
    pub speech_rate: f32,
    #[serde(deserialize_with = "numeric::de_volume")]
    pub volume: u8,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            active_profile: None,
            toggles: Toggles::default(),
            contrast_theme: ContrastTheme::default(),
            color_blind_filter: ColorBlindFilter::default(),
            saturation: Saturation::default(),
            cursor_color: CursorColor::default(),
            font_family: FontFamily::default(),
            spacing: Spacing::default(),
            click_delay: ClickDelay::default(),
            font_size: NumericField::FontSize.bounds().default as u16,
            brightness: NumericField::Brightness.bounds().default as u8,
            speech_rate: NumericField::SpeechRate.bounds().default as f32,
            volume: NumericField::Volume.bounds().default as u8,
        }
    }
}

impl A11yConfig {
    /// Wire key of the profile label
    pub const ACTIVE_PROFILE_KEY: &'static str = "activeProfile";

    pub fn toggle(&self, field: ToggleField) -> bool {
        self.toggles.get(field)
    }

    pub fn set_toggle(&mut self, field: ToggleField, value: bool) {
        self.toggles.set(field, value);
    }

    pub fn choice(&self, field: ChoiceField) -> Choice {
        match field {
            ChoiceField::Contrast => Choice::Contrast(self.contrast_theme),
            ChoiceField::ColorBlind => Choice::ColorBlind(self.color_blind_filter),
            ChoiceField::Saturation => Choice::Saturation(self.saturation),
            ChoiceField::CursorColor => Choice::CursorColor(self.cursor_color),
            ChoiceField::FontFamily => Choice::FontFamily(self.font_family),
            ChoiceField::Spacing => Choice::Spacing(self.spacing),
            ChoiceField::ClickDelay => Choice::ClickDelay(self.click_delay),
        }
    }

    pub fn set_choice(&mut self, choice: Choice) {
        match choice {
            Choice::Contrast(v) => self.contrast_theme = v,
            Choice::ColorBlind(v) => self.color_blind_filter = v,
            Choice::Saturation(v) => self.saturation = v,
            Choice::CursorColor(v) => self.cursor_color = v,
            Choice::FontFamily(v) => self.font_family = v,
            Choice::Spacing(v) => self.spacing = v,
            Choice::ClickDelay(v) => self.click_delay = v,
        }
    }

    pub fn number(&self, field: NumericField) -> f64 {
        match field {
            NumericField::FontSize => f64::from(self.font_size),
            NumericField::Brightness => f64::from(self.brightness),
            NumericField::SpeechRate => f64::from(self.speech_rate),
            NumericField::Volume => f64::from(self.volume),
        }
    }

    /// Set a numeric field, clamping into its bounds
    pub fn set_number(&mut self, field: NumericField, value: f64) {
        let value = field.clamp(value);
        match field {
            NumericField::FontSize => self.font_size = value.round() as u16,
            NumericField::Brightness => self.brightness = value.round() as u8,
            NumericField::SpeechRate => self.speech_rate = value as f32,
            NumericField::Volume => self.volume = value.round() as u8,
        }
    }

    /// Re-clamp every numeric field
    pub fn sanitize(&mut self) {
        for &field in NumericField::ALL {
            let current = self.number(field);
            if !field.is_valid(current) {
                self.set_number(field, current);
            }
        }
    }

    /// Whether `key` names a field of this record
    pub fn is_known_key(key: &str) -> bool {
        key == Self::ACTIVE_PROFILE_KEY
            || ToggleField::ALL.iter().any(|f| f.key() == key)
            || ChoiceField::ALL.iter().any(|f| f.key() == key)
            || NumericField::ALL.iter().any(|f| f.key() == key)
    }

    /// Overlay a (possibly stale) snapshot onto this record, key by key.
    ///
    /// Keys present in `overlay` win. Unknown keys and keys whose value does
    /// not decode for that field are skipped; everything else keeps its
    /// current value.
    pub fn merged_with(&self, overlay: &Map<String, Value>) -> A11yConfig {
        let mut base = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => return self.clone(),
        };

        for (key, value) in overlay {
            if !Self::is_known_key(key) {
                tracing::trace!(key = %key, "Ignoring unknown config key");
                continue;
            }
            let probe = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            if serde_json::from_value::<A11yConfig>(probe).is_ok() {
                base.insert(key.clone(), value.clone());
            } else {
                tracing::debug!(key = %key, value = %value, "Skipping undecodable config value");
            }
        }

        let mut merged = serde_json::from_value::<A11yConfig>(Value::Object(base))
            .unwrap_or_else(|_| self.clone());
        merged.sanitize();
        merged
    }

    /// Decode a stored snapshot, backfilling from defaults
    pub fn from_snapshot(snapshot: &Value) -> Option<A11yConfig> {
        snapshot
            .as_object()
            .map(|map| A11yConfig::default().merged_with(map))
    }
}
