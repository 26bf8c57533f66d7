//! Mutation engine
//!
//! The only ways to change configuration state. `apply` is pure and total:
//! it never fails, never edits the input, and always returns a brand-new
//! snapshot together with any feedback pulse the transition calls for.

mod feedback;
mod store;

pub use feedback::{FeedbackPulse, HapticSink, LogHaptics};
pub use store::ConfigStore;

#[cfg(test)]
pub(crate) use feedback::RecordingHaptics;

use std::sync::Arc;

use crate::model::{A11yConfig, Choice, NumericField, StepDirection, ToggleField};
use crate::profiles::{self, ProfileId};

/// A single state transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Flip one boolean field
    Toggle(ToggleField),
    /// Set one enumerated field
    SetChoice(Choice),
    /// Set one numeric field (clamped)
    SetNumber(NumericField, f64),
    /// Increase or decrease one numeric field by its step (clamped)
    Step(NumericField, StepDirection),
    /// Switch to a profile, or back to defaults when it is already active
    ActivateProfile(ProfileId),
    /// Back to the default record
    Reset,
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct Applied {
    pub config: Arc<A11yConfig>,
    pub feedback: Option<FeedbackPulse>,
}

/// Apply `mutation` to `current`
pub fn apply(current: &A11yConfig, mutation: Mutation) -> Applied {
    match mutation {
        Mutation::Toggle(field) => {
            let mut next = current.clone();
            let enabled = !next.toggle(field);
            next.set_toggle(field, enabled);

            // Confirmation only on enabling haptics; switching them off stays silent
            let feedback = (field == ToggleField::AdaptiveHaptics && enabled)
                .then_some(FeedbackPulse::Confirm);
            Applied {
                config: Arc::new(next),
                feedback,
            }
        }
        Mutation::SetChoice(choice) => {
            let mut next = current.clone();
            next.set_choice(choice);
            quiet(next)
        }
        Mutation::SetNumber(field, value) => {
            let mut next = current.clone();
            next.set_number(field, value);
            quiet(next)
        }
        Mutation::Step(field, direction) => {
            let mut next = current.clone();
            let value = field.stepped(next.number(field), direction);
            next.set_number(field, value);
            quiet(next)
        }
        Mutation::ActivateProfile(id) if current.active_profile == Some(id) => {
            quiet(A11yConfig::default())
        }
        Mutation::ActivateProfile(id) => Applied {
            config: Arc::new(profiles::build(id)),
            feedback: Some(FeedbackPulse::ProfileSwitch),
        },
        Mutation::Reset => quiet(A11yConfig::default()),
    }
}

fn quiet(config: A11yConfig) -> Applied {
    Applied {
        config: Arc::new(config),
        feedback: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChoiceField, FontFamily, Spacing};

    fn sample() -> A11yConfig {
        let mut config = profiles::build(ProfileId::Cognitive);
        config.font_family = FontFamily::Lexend;
        config.brightness = 60;
        config
    }

    #[test]
    fn test_toggle_changes_exactly_one_field() {
        let base = sample();
        for &field in ToggleField::ALL {
            let applied = apply(&base, Mutation::Toggle(field));
            let mut expected = base.clone();
            expected.set_toggle(field, !base.toggle(field));
            assert_eq!(*applied.config, expected, "toggle {}", field);
            assert_eq!(applied.config.active_profile, base.active_profile);
        }
    }

    #[test]
    fn test_toggle_twice_restores() {
        let base = sample();
        let once = apply(&base, Mutation::Toggle(ToggleField::Captions));
        let twice = apply(&once.config, Mutation::Toggle(ToggleField::Captions));
        assert_eq!(*twice.config, base);
    }

    #[test]
    fn test_haptics_pulse_only_when_enabling() {
        let base = A11yConfig::default();
        let on = apply(&base, Mutation::Toggle(ToggleField::AdaptiveHaptics));
        assert_eq!(on.feedback, Some(FeedbackPulse::Confirm));

        let off = apply(&on.config, Mutation::Toggle(ToggleField::AdaptiveHaptics));
        assert_eq!(off.feedback, None);

        let other = apply(&base, Mutation::Toggle(ToggleField::Captions));
        assert_eq!(other.feedback, None);
    }

    #[test]
    fn test_activate_profile_twice_returns_defaults() {
        for &id in ProfileId::ALL {
            let first = apply(&A11yConfig::default(), Mutation::ActivateProfile(id));
            assert_eq!(first.config.active_profile, Some(id));
            assert_eq!(first.feedback, Some(FeedbackPulse::ProfileSwitch));

            let second = apply(&first.config, Mutation::ActivateProfile(id));
            assert_eq!(*second.config, A11yConfig::default(), "{}", id);
            assert_eq!(second.feedback, None);
        }
    }

    #[test]
    fn test_switching_profiles_leaves_nothing_behind() {
        let low_vision = apply(
            &A11yConfig::default(),
            Mutation::ActivateProfile(ProfileId::LowVision),
        );
        let hearing = apply(
            &low_vision.config,
            Mutation::ActivateProfile(ProfileId::Hearing),
        );
        assert_eq!(*hearing.config, profiles::build(ProfileId::Hearing));
        assert!(!hearing.config.toggles.magnifier);
        assert_eq!(hearing.config.font_size, 100);
    }

    #[test]
    fn test_activate_profile_from_edited_state_is_full_replace() {
        let mut edited = sample();
        edited.toggles.sign_language = true;
        let applied = apply(&edited, Mutation::ActivateProfile(ProfileId::Dislexia));
        assert_eq!(*applied.config, profiles::build(ProfileId::Dislexia));
    }

    #[test]
    fn test_field_edit_keeps_stale_profile_label() {
        let dyslexia = apply(
            &A11yConfig::default(),
            Mutation::ActivateProfile(ProfileId::Dislexia),
        );
        let edited = apply(&dyslexia.config, Mutation::Toggle(ToggleField::LineFocus));
        assert!(!edited.config.toggles.line_focus);
        assert_eq!(edited.config.active_profile, Some(ProfileId::Dislexia));
    }

    #[test]
    fn test_set_choice_and_number() {
        let base = A11yConfig::default();
        let spaced = apply(&base, Mutation::SetChoice(Choice::Spacing(Spacing::ExtraWide)));
        assert_eq!(spaced.config.choice(ChoiceField::Spacing), Choice::Spacing(Spacing::ExtraWide));
        assert_eq!(spaced.config.active_profile, None);

        let big = apply(&base, Mutation::SetNumber(NumericField::FontSize, 1_000.0));
        assert_eq!(big.config.font_size, 200);
        let small = apply(&base, Mutation::SetNumber(NumericField::FontSize, 0.0));
        assert_eq!(small.config.font_size, 70);
    }

    #[test]
    fn test_repeated_steps_stay_in_bounds() {
        let mut config = Arc::new(A11yConfig::default());
        for _ in 0..30 {
            config = apply(&config, Mutation::Step(NumericField::FontSize, StepDirection::Up)).config;
        }
        assert_eq!(config.font_size, 200);
        for _ in 0..30 {
            config =
                apply(&config, Mutation::Step(NumericField::FontSize, StepDirection::Down)).config;
        }
        assert_eq!(config.font_size, 70);
    }

    #[test]
    fn test_reset_from_anywhere() {
        let applied = apply(&sample(), Mutation::Reset);
        assert_eq!(*applied.config, A11yConfig::default());
        assert_eq!(applied.feedback, None);
    }

    #[test]
    fn test_every_mutation_allocates_new_snapshot() {
        let base = Arc::new(A11yConfig::default());
        let applied = apply(&base, Mutation::Reset);
        assert!(!Arc::ptr_eq(&base, &applied.config));
        assert_eq!(*applied.config, *base);
    }
}
