//! Profile catalog
//!
//! A profile is a named preset that rewrites a fixed slice of the
//! configuration. Activation always starts from the complete default record,
//! so nothing from a previously active profile survives the switch.
//!
//! The override sets are curated product decisions; keep them as written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{
    A11yConfig, Choice, ClickDelay, ColorBlindFilter, ContrastTheme, CursorColor, FontFamily,
    NumericField, ParseFieldError, Saturation, Spacing, ToggleField,
};

/// Named accessibility presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileId {
    LowVision,
    Blind,
    Dislexia,
    Autism,
    Adhd,
    Epilepsy,
    Motor,
    Hearing,
    Cognitive,
    ColorBlind,
    Elderly,
}

/// One field assignment inside a profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Override {
    Toggle(ToggleField, bool),
    Choice(Choice),
    Number(NumericField, f64),
}

impl Override {
    fn apply(self, config: &mut A11yConfig) {
        match self {
            Override::Toggle(field, value) => config.set_toggle(field, value),
            Override::Choice(choice) => config.set_choice(choice),
            Override::Number(field, value) => config.set_number(field, value),
        }
    }
}

use Override::{Choice as C, Number as N, Toggle as T};

const LOW_VISION: &[Override] = &[
    N(NumericField::FontSize, 150.0),
    C(Choice::Contrast(ContrastTheme::WhiteOnBlack)),
    T(ToggleField::LargeCursor, true),
    C(Choice::CursorColor(CursorColor::Yellow)),
    T(ToggleField::Magnifier, true),
    T(ToggleField::HighlightFocus, true),
    T(ToggleField::BoldText, true),
];

const BLIND: &[Override] = &[
    T(ToggleField::ScreenReader, true),
    T(ToggleField::TextToSpeech, true),
    T(ToggleField::AudioDescriptions, true),
    T(ToggleField::KeyboardNavigation, true),
    T(ToggleField::PageStructure, true),
    T(ToggleField::VoiceControl, true),
    N(NumericField::SpeechRate, 1.25),
];

const DISLEXIA: &[Override] = &[
    C(Choice::Spacing(Spacing::Wide)),
    C(Choice::FontFamily(FontFamily::OpenDyslexic)),
    T(ToggleField::LineFocus, true),
    C(Choice::Contrast(ContrastTheme::HighContrastLight)),
    T(ToggleField::TextAlignLeft, true),
    T(ToggleField::WordHighlight, true),
    N(NumericField::FontSize, 110.0),
];

const AUTISM: &[Override] = &[
    T(ToggleField::ReduceMotion, true),
    C(Choice::Saturation(Saturation::Low)),
    T(ToggleField::DisableAutoplay, true),
    T(ToggleField::HideDistractions, true),
    T(ToggleField::MuteSounds, true),
    T(ToggleField::SimplifiedLayout, true),
];

const ADHD: &[Override] = &[
    T(ToggleField::FocusMode, true),
    T(ToggleField::ReadingMask, true),
    T(ToggleField::HideDistractions, true),
    T(ToggleField::DisableAutoplay, true),
    T(ToggleField::ProgressIndicators, true),
    T(ToggleField::StopAnimations, true),
];

const EPILEPSY: &[Override] = &[
    T(ToggleField::SeizureSafe, true),
    T(ToggleField::StopAnimations, true),
    T(ToggleField::ReduceMotion, true),
    T(ToggleField::DisableAutoplay, true),
    C(Choice::Saturation(Saturation::Low)),
    N(NumericField::Brightness, 80.0),
];

const MOTOR: &[Override] = &[
    T(ToggleField::LargeTargets, true),
    T(ToggleField::KeyboardNavigation, true),
    T(ToggleField::StickyKeys, true),
    T(ToggleField::DwellClick, true),
    C(Choice::ClickDelay(ClickDelay::Medium)),
    T(ToggleField::LargeCursor, true),
    T(ToggleField::VoiceControl, true),
    T(ToggleField::ExtendedTimeouts, true),
];

const HEARING: &[Override] = &[
    T(ToggleField::Captions, true),
    T(ToggleField::SignLanguage, true),
    T(ToggleField::VisualAlerts, true),
    T(ToggleField::MonoAudio, true),
    T(ToggleField::AdaptiveHaptics, true),
];

const COGNITIVE: &[Override] = &[
    T(ToggleField::SimpleLanguage, true),
    T(ToggleField::SimplifiedLayout, true),
    T(ToggleField::IconLabels, true),
    T(ToggleField::TooltipsAlways, true),
    T(ToggleField::Dictionary, true),
    T(ToggleField::ConfirmActions, true),
    T(ToggleField::ExtendedTimeouts, true),
    T(ToggleField::AutosaveForms, true),
    T(ToggleField::EmphasizeErrors, true),
    N(NumericField::FontSize, 120.0),
];

const COLOR_BLIND: &[Override] = &[
    C(Choice::ColorBlind(ColorBlindFilter::Deuteranopia)),
    T(ToggleField::HighlightLinks, true),
    T(ToggleField::UnderlineLinks, true),
    T(ToggleField::EmphasizeErrors, true),
    T(ToggleField::IconLabels, true),
];

const ELDERLY: &[Override] = &[
    N(NumericField::FontSize, 130.0),
    C(Choice::Contrast(ContrastTheme::HighContrastLight)),
    T(ToggleField::LargeCursor, true),
    T(ToggleField::LargeTargets, true),
    T(ToggleField::BoldText, true),
    T(ToggleField::ExtendedTimeouts, true),
    T(ToggleField::ConfirmActions, true),
    N(NumericField::SpeechRate, 0.75),
];

/// Field overrides implied by a profile
pub fn resolve(id: ProfileId) -> &'static [Override] {
    match id {
        ProfileId::LowVision => LOW_VISION,
        ProfileId::Blind => BLIND,
        ProfileId::Dislexia => DISLEXIA,
        ProfileId::Autism => AUTISM,
        ProfileId::Adhd => ADHD,
        ProfileId::Epilepsy => EPILEPSY,
        ProfileId::Motor => MOTOR,
        ProfileId::Hearing => HEARING,
        ProfileId::Cognitive => COGNITIVE,
        ProfileId::ColorBlind => COLOR_BLIND,
        ProfileId::Elderly => ELDERLY,
    }
}

/// Defaults with the profile's overrides layered on, labelled with `id`
pub fn build(id: ProfileId) -> A11yConfig {
    let mut config = A11yConfig::default();
    for &entry in resolve(id) {
        entry.apply(&mut config);
    }
    config.active_profile = Some(id);
    config
}

impl ProfileId {
    pub const ALL: &'static [ProfileId] = &[
        ProfileId::LowVision,
        ProfileId::Blind,
        ProfileId::Dislexia,
        ProfileId::Autism,
        ProfileId::Adhd,
        ProfileId::Epilepsy,
        ProfileId::Motor,
        ProfileId::Hearing,
        ProfileId::Cognitive,
        ProfileId::ColorBlind,
        ProfileId::Elderly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileId::LowVision => "low-vision",
            ProfileId::Blind => "blind",
            ProfileId::Dislexia => "dislexia",
            ProfileId::Autism => "autism",
            ProfileId::Adhd => "adhd",
            ProfileId::Epilepsy => "epilepsy",
            ProfileId::Motor => "motor",
            ProfileId::Hearing => "hearing",
            ProfileId::Cognitive => "cognitive",
            ProfileId::ColorBlind => "color-blind",
            ProfileId::Elderly => "elderly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileId::LowVision => "Low vision",
            ProfileId::Blind => "Blind",
            ProfileId::Dislexia => "Dyslexia",
            ProfileId::Autism => "Autism",
            ProfileId::Adhd => "ADHD",
            ProfileId::Epilepsy => "Epilepsy",
            ProfileId::Motor => "Motor impairment",
            ProfileId::Hearing => "Hearing impairment",
            ProfileId::Cognitive => "Cognitive",
            ProfileId::ColorBlind => "Color blindness",
            ProfileId::Elderly => "Older adults",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ProfileId::LowVision => "Large text, white-on-black contrast, large pointer, magnifier",
            ProfileId::Blind => "Screen reader, speech output and keyboard-first navigation",
            ProfileId::Dislexia => "Dyslexia-friendly font, wide spacing and line focus",
            ProfileId::Autism => "Calm visuals: reduced motion, low saturation, no autoplay",
            ProfileId::Adhd => "Focus mode, reading mask and fewer distractions",
            ProfileId::Epilepsy => "Seizure-safe: no animation or flashing, dimmed colours",
            ProfileId::Motor => "Large targets, sticky keys, dwell click and click delay",
            ProfileId::Hearing => "Captions, sign language, visual alerts and haptics",
            ProfileId::Cognitive => "Plain language, simplified layout and extra guidance",
            ProfileId::ColorBlind => "Colour filter with non-colour cues for links and errors",
            ProfileId::Elderly => "Larger text and targets, slower speech, more time",
        }
    }
}

impl FromStr for ProfileId {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseFieldError::InvalidValue {
                field: A11yConfig::ACTIVE_PROFILE_KEY,
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde adapter: `Option<ProfileId>` on the wire as the id or `"none"`
pub(crate) mod label {
    use super::ProfileId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub const NONE: &str = "none";

    pub fn serialize<S: Serializer>(value: &Option<ProfileId>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(ProfileId::as_str).unwrap_or(NONE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProfileId>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(s) if s == NONE => Ok(None),
            Some(s) => s.parse().map(Some).map_err(D::Error::custom),
        }
    }
}
