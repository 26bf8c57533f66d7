//! Boolean preference fields
//!
//! Every toggle is declared exactly once in the `toggle_fields!` invocation
//! below. The macro generates the `Toggles` record, the `ToggleField`
//! identifier and the static key/selector table that persistence and
//! projection read from, so adding a toggle is a one-line change.

use serde::{Deserialize, Serialize};

use super::ParseFieldError;

macro_rules! toggle_fields {
    ($( $(#[$doc:meta])* $field:ident => $variant:ident, $key:literal, $selector:literal; )+) => {
        /// All boolean preferences. Every toggle starts out disabled.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Toggles {
            $(
                $(#[$doc])*
                #[serde(rename = $key)]
                pub $field: bool,
            )+
        }

        /// Identifier for one boolean preference
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ToggleField {
            $( $variant, )+
        }

        impl ToggleField {
            /// Every toggle, in declaration order
            pub const ALL: &'static [ToggleField] = &[ $( ToggleField::$variant, )+ ];

            /// Wire key used in cached and remote snapshots
            pub fn key(self) -> &'static str {
                match self {
                    $( ToggleField::$variant => $key, )+
                }
            }

            /// Style selector emitted while the toggle is on
            pub fn selector(self) -> &'static str {
                match self {
                    $( ToggleField::$variant => $selector, )+
                }
            }
        }

        impl Toggles {
            pub fn get(&self, field: ToggleField) -> bool {
                match field {
                    $( ToggleField::$variant => self.$field, )+
                }
            }

            pub fn set(&mut self, field: ToggleField, value: bool) {
                match field {
                    $( ToggleField::$variant => self.$field = value, )+
                }
            }
        }
    };
}

toggle_fields! {
    // ─── Vision ──────────────────────────────────────────────
    screen_reader => ScreenReader, "screenReader", "a11y-screen-reader";
    text_to_speech => TextToSpeech, "textToSpeech", "a11y-text-to-speech";
    /// Screen magnifier overlay
    magnifier => Magnifier, "magnifier", "a11y-magnifier";
    large_cursor => LargeCursor, "largeCursor", "a11y-large-cursor";
    highlight_links => HighlightLinks, "highlightLinks", "a11y-highlight-links";
    highlight_headings => HighlightHeadings, "highlightHeadings", "a11y-highlight-headings";
    highlight_focus => HighlightFocus, "highlightFocus", "a11y-highlight-focus";
    bold_text => BoldText, "boldText", "a11y-bold-text";
    underline_links => UnderlineLinks, "underlineLinks", "a11y-underline-links";
    hide_images => HideImages, "hideImages", "a11y-hide-images";
    invert_colors => InvertColors, "invertColors", "a11y-invert-colors";
    monochrome => Monochrome, "monochrome", "a11y-monochrome";
    night_mode => NightMode, "nightMode", "a11y-night-mode";
    blue_light_filter => BlueLightFilter, "blueLightFilter", "a11y-blue-light-filter";

    // ─── Reading ─────────────────────────────────────────────
    /// Dims everything except the line under the pointer
    line_focus => LineFocus, "lineFocus", "a11y-line-focus";
    reading_guide => ReadingGuide, "readingGuide", "a11y-reading-guide";
    reading_mask => ReadingMask, "readingMask", "a11y-reading-mask";
    text_align_left => TextAlignLeft, "textAlignLeft", "a11y-text-align-left";
    word_highlight => WordHighlight, "wordHighlight", "a11y-word-highlight";
    syllable_highlight => SyllableHighlight, "syllableHighlight", "a11y-syllable-highlight";
    dictionary => Dictionary, "dictionary", "a11y-dictionary";
    simple_language => SimpleLanguage, "simpleLanguage", "a11y-simple-language";

    // ─── Motion & media ──────────────────────────────────────
    reduce_motion => ReduceMotion, "reduceMotion", "a11y-reduce-motion";
    stop_animations => StopAnimations, "stopAnimations", "a11y-stop-animations";
    disable_autoplay => DisableAutoplay, "disableAutoplay", "a11y-disable-autoplay";
    /// Suppresses flashing content above the photosensitivity threshold
    seizure_safe => SeizureSafe, "seizureSafe", "a11y-seizure-safe";
    mute_sounds => MuteSounds, "muteSounds", "a11y-mute-sounds";

    // ─── Hearing ─────────────────────────────────────────────
    captions => Captions, "captions", "a11y-captions";
    sign_language => SignLanguage, "signLanguage", "a11y-sign-language";
    visual_alerts => VisualAlerts, "visualAlerts", "a11y-visual-alerts";
    audio_descriptions => AudioDescriptions, "audioDescriptions", "a11y-audio-descriptions";
    mono_audio => MonoAudio, "monoAudio", "a11y-mono-audio";

    // ─── Motor ───────────────────────────────────────────────
    voice_control => VoiceControl, "voiceControl", "a11y-voice-control";
    keyboard_navigation => KeyboardNavigation, "keyboardNavigation", "a11y-keyboard-navigation";
    sticky_keys => StickyKeys, "stickyKeys", "a11y-sticky-keys";
    large_targets => LargeTargets, "largeTargets", "a11y-large-targets";
    dwell_click => DwellClick, "dwellClick", "a11y-dwell-click";
    virtual_keyboard => VirtualKeyboard, "virtualKeyboard", "a11y-virtual-keyboard";
    /// Vibration feedback on supported devices
    adaptive_haptics => AdaptiveHaptics, "adaptiveHaptics", "a11y-adaptive-haptics";

    // ─── Cognitive ───────────────────────────────────────────
    simplified_layout => SimplifiedLayout, "simplifiedLayout", "a11y-simplified-layout";
    focus_mode => FocusMode, "focusMode", "a11y-focus-mode";
    hide_distractions => HideDistractions, "hideDistractions", "a11y-hide-distractions";
    tooltips_always => TooltipsAlways, "tooltipsAlways", "a11y-tooltips-always";
    page_structure => PageStructure, "pageStructure", "a11y-page-structure";
    progress_indicators => ProgressIndicators, "progressIndicators", "a11y-progress-indicators";
    confirm_actions => ConfirmActions, "confirmActions", "a11y-confirm-actions";
    extended_timeouts => ExtendedTimeouts, "extendedTimeouts", "a11y-extended-timeouts";
    autosave_forms => AutosaveForms, "autosaveForms", "a11y-autosave-forms";
    icon_labels => IconLabels, "iconLabels", "a11y-icon-labels";
    emphasize_errors => EmphasizeErrors, "emphasizeErrors", "a11y-emphasize-errors";
}

impl ToggleField {
    /// Look up a toggle by its exact wire key
    pub fn from_key(key: &str) -> Result<Self, ParseFieldError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .ok_or_else(|| ParseFieldError::UnknownField(key.to_string()))
    }

    /// Look up a toggle by wire key (`lineFocus`) or selector suffix (`line-focus`)
    pub fn from_name(name: &str) -> Result<Self, ParseFieldError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == name || f.selector().strip_prefix("a11y-") == Some(name))
            .ok_or_else(|| ParseFieldError::UnknownField(name.to_string()))
    }
}

impl std::fmt::Display for ToggleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_and_selectors_are_unique() {
        let keys: HashSet<_> = ToggleField::ALL.iter().map(|f| f.key()).collect();
        let selectors: HashSet<_> = ToggleField::ALL.iter().map(|f| f.selector()).collect();

        assert_eq!(keys.len(), ToggleField::ALL.len());
        assert_eq!(selectors.len(), ToggleField::ALL.len());
        assert_eq!(ToggleField::ALL.len(), 50);
    }

    #[test]
    fn test_every_selector_is_namespaced() {
        for field in ToggleField::ALL {
            assert!(
                field.selector().starts_with("a11y-"),
                "{} has a selector outside the a11y- namespace",
                field
            );
        }
    }

    #[test]
    fn test_get_set_round_trip_every_field() {
        let mut toggles = Toggles::default();
        for &field in ToggleField::ALL {
            assert!(!toggles.get(field));
            toggles.set(field, true);
            assert!(toggles.get(field), "{} did not stick", field);
        }
        assert!(ToggleField::ALL.iter().all(|&f| toggles.get(f)));
    }

    #[test]
    fn test_wire_keys_match_serde_names() {
        let mut toggles = Toggles::default();
        toggles.set(ToggleField::LineFocus, true);
        let json = serde_json::to_value(&toggles).unwrap();
        let map = json.as_object().unwrap();

        assert_eq!(map.len(), ToggleField::ALL.len());
        for field in ToggleField::ALL {
            assert!(map.contains_key(field.key()), "missing key {}", field.key());
        }
        assert_eq!(map["lineFocus"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_from_name_accepts_key_and_kebab() {
        assert_eq!(
            ToggleField::from_name("lineFocus").unwrap(),
            ToggleField::LineFocus
        );
        assert_eq!(
            ToggleField::from_name("line-focus").unwrap(),
            ToggleField::LineFocus
        );
        assert!(matches!(
            ToggleField::from_name("warpDrive"),
            Err(ParseFieldError::UnknownField(_))
        ));
        assert!(ToggleField::from_key("line-focus").is_err());
        assert_eq!(
            ToggleField::from_key("lineFocus").unwrap(),
            ToggleField::LineFocus
        );
    }
}
