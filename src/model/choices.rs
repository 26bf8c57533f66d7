//! Enumerated preference fields
//!
//! Each field has a small fixed value set whose first member is the
//! "default/none" value. Only non-default values produce a projected selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseFieldError;

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, {
            $default:ident = $default_str:literal,
            $( $variant:ident = $s:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $default_str)]
            $default,
            $(
                #[serde(rename = $s)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$default, $( $name::$variant, )+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$default => $default_str,
                    $( $name::$variant => $s, )+
                }
            }

            pub fn is_default(self) -> bool {
                self == $name::$default
            }
        }

        impl FromStr for $name {
            type Err = ParseFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ParseFieldError::InvalidValue {
                        field: $field.key(),
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Page colour scheme
    ContrastTheme, ChoiceField::Contrast, {
        Default = "default",
        HighContrastLight = "high-contrast-light",
        HighContrastDark = "high-contrast-dark",
        WhiteOnBlack = "white-on-black",
        YellowOnBlack = "yellow-on-black",
        BlackOnYellow = "black-on-yellow",
    }
}

choice_enum! {
    /// Colour-vision correction filter
    ColorBlindFilter, ChoiceField::ColorBlind, {
        None = "none",
        Protanopia = "protanopia",
        Deuteranopia = "deuteranopia",
        Tritanopia = "tritanopia",
        Achromatopsia = "achromatopsia",
    }
}

choice_enum! {
    Saturation, ChoiceField::Saturation, {
        Default = "default",
        Low = "low",
        High = "high",
    }
}

choice_enum! {
    CursorColor, ChoiceField::CursorColor, {
        Default = "default",
        Black = "black",
        White = "white",
        Yellow = "yellow",
        Red = "red",
    }
}

choice_enum! {
    FontFamily, ChoiceField::FontFamily, {
        Default = "default",
        OpenDyslexic = "opendyslexic",
        AtkinsonHyperlegible = "atkinson-hyperlegible",
        Lexend = "lexend",
        SansSerif = "sans-serif",
    }
}

choice_enum! {
    /// Letter, word and line spacing preset
    Spacing, ChoiceField::Spacing, {
        Default = "default",
        Wide = "wide",
        ExtraWide = "extra-wide",
    }
}

choice_enum! {
    /// Delay before a press registers as a click
    ClickDelay, ChoiceField::ClickDelay, {
        None = "none",
        Short = "short",
        Medium = "medium",
        Long = "long",
    }
}

/// Identifier for one enumerated preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceField {
    Contrast,
    ColorBlind,
    Saturation,
    CursorColor,
    FontFamily,
    Spacing,
    ClickDelay,
}

impl ChoiceField {
    pub const ALL: &'static [ChoiceField] = &[
        ChoiceField::Contrast,
        ChoiceField::ColorBlind,
        ChoiceField::Saturation,
        ChoiceField::CursorColor,
        ChoiceField::FontFamily,
        ChoiceField::Spacing,
        ChoiceField::ClickDelay,
    ];

    /// Wire key used in cached and remote snapshots
    pub const fn key(self) -> &'static str {
        match self {
            ChoiceField::Contrast => "contrastTheme",
            ChoiceField::ColorBlind => "colorBlindFilter",
            ChoiceField::Saturation => "saturation",
            ChoiceField::CursorColor => "cursorColor",
            ChoiceField::FontFamily => "fontFamily",
            ChoiceField::Spacing => "spacing",
            ChoiceField::ClickDelay => "clickDelay",
        }
    }

    /// Selector namespace; the projected selector is `<namespace>-<value>`
    pub fn namespace(self) -> &'static str {
        match self {
            ChoiceField::Contrast => "a11y-contrast",
            ChoiceField::ColorBlind => "a11y-colorblind",
            ChoiceField::Saturation => "a11y-saturation",
            ChoiceField::CursorColor => "a11y-cursor",
            ChoiceField::FontFamily => "a11y-font",
            ChoiceField::Spacing => "a11y-spacing",
            ChoiceField::ClickDelay => "a11y-click-delay",
        }
    }

    /// Wire strings of every allowed value, default first
    pub fn values(self) -> Vec<&'static str> {
        match self {
            ChoiceField::Contrast => ContrastTheme::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::ColorBlind => ColorBlindFilter::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::Saturation => Saturation::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::CursorColor => CursorColor::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::FontFamily => FontFamily::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::Spacing => Spacing::ALL.iter().map(|v| v.as_str()).collect(),
            ChoiceField::ClickDelay => ClickDelay::ALL.iter().map(|v| v.as_str()).collect(),
        }
    }

    pub fn from_key(key: &str) -> Result<Self, ParseFieldError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .ok_or_else(|| ParseFieldError::UnknownField(key.to_string()))
    }
}

/// A value for one enumerated field. Carrying the field in the variant keeps
/// `set_choice` total: a value can never land in the wrong field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    Contrast(ContrastTheme),
    ColorBlind(ColorBlindFilter),
    Saturation(Saturation),
    CursorColor(CursorColor),
    FontFamily(FontFamily),
    Spacing(Spacing),
    ClickDelay(ClickDelay),
}

impl Choice {
    pub fn field(self) -> ChoiceField {
        match self {
            Choice::Contrast(_) => ChoiceField::Contrast,
            Choice::ColorBlind(_) => ChoiceField::ColorBlind,
            Choice::Saturation(_) => ChoiceField::Saturation,
            Choice::CursorColor(_) => ChoiceField::CursorColor,
            Choice::FontFamily(_) => ChoiceField::FontFamily,
            Choice::Spacing(_) => ChoiceField::Spacing,
            Choice::ClickDelay(_) => ChoiceField::ClickDelay,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Contrast(v) => v.as_str(),
            Choice::ColorBlind(v) => v.as_str(),
            Choice::Saturation(v) => v.as_str(),
            Choice::CursorColor(v) => v.as_str(),
            Choice::FontFamily(v) => v.as_str(),
            Choice::Spacing(v) => v.as_str(),
            Choice::ClickDelay(v) => v.as_str(),
        }
    }

    pub fn is_default(self) -> bool {
        match self {
            Choice::Contrast(v) => v.is_default(),
            Choice::ColorBlind(v) => v.is_default(),
            Choice::Saturation(v) => v.is_default(),
            Choice::CursorColor(v) => v.is_default(),
            Choice::FontFamily(v) => v.is_default(),
            Choice::Spacing(v) => v.is_default(),
            Choice::ClickDelay(v) => v.is_default(),
        }
    }

    /// Parse a wire string for the given field
    pub fn parse(field: ChoiceField, value: &str) -> Result<Self, ParseFieldError> {
        Ok(match field {
            ChoiceField::Contrast => Choice::Contrast(value.parse()?),
            ChoiceField::ColorBlind => Choice::ColorBlind(value.parse()?),
            ChoiceField::Saturation => Choice::Saturation(value.parse()?),
            ChoiceField::CursorColor => Choice::CursorColor(value.parse()?),
            ChoiceField::FontFamily => Choice::FontFamily(value.parse()?),
            ChoiceField::Spacing => Choice::Spacing(value.parse()?),
            ChoiceField::ClickDelay => Choice::ClickDelay(value.parse()?),
        })
    }

    /// Composite selector (`a11y-spacing-wide`), or `None` for the default member
    pub fn selector(self) -> Option<String> {
        if self.is_default() {
            return None;
        }
        Some(format!("{}-{}", self.field().namespace(), self.as_str()))
    }
}
