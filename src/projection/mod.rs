// View projection
//
// Turns a config snapshot into presentation state:
// - every enabled toggle    → one selector (`a11y-large-cursor`)
// - every non-default choice → one composite selector (`a11y-contrast-white-on-black`)
// - fontSize / brightness    → scalar variables (`--a11y-font-size: 150%`)
//
// The target is cleared and rebuilt on every render. That makes the result
// depend only on the current snapshot, and also removes any selector some
// other code added to the same root.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::{A11yConfig, ChoiceField, ToggleField};

pub const FONT_SIZE_VAR: &str = "--a11y-font-size";
pub const BRIGHTNESS_VAR: &str = "--a11y-brightness";

/// Everything the presentation layer applies for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleProjection {
    pub selectors: BTreeSet<String>,
    pub variables: BTreeMap<String, String>,
}

/// Compute the full projection of `config`
pub fn project(config: &A11yConfig) -> StyleProjection {
    let mut selectors: BTreeSet<String> = ToggleField::ALL
        .iter()
        .filter(|&&field| config.toggle(field))
        .map(|field| field.selector().to_string())
        .collect();

    selectors.extend(
        ChoiceField::ALL
            .iter()
            .filter_map(|&field| config.choice(field).selector()),
    );

    let variables = BTreeMap::from([
        (FONT_SIZE_VAR.to_string(), format!("{}%", config.font_size)),
        (BRIGHTNESS_VAR.to_string(), format!("{}%", config.brightness)),
    ]);

    StyleProjection {
        selectors,
        variables,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render targets
// ─────────────────────────────────────────────────────────────────────────────

/// Root scope the projection is written into
pub trait RenderTarget: Send {
    fn clear_selectors(&mut self);
    fn add_selector(&mut self, selector: &str);
    fn set_variable(&mut self, name: &str, value: &str);
}

/// In-memory root: a class list plus inline custom properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRoot {
    classes: BTreeSet<String>,
    variables: BTreeMap<String, String>,
}

impl StyleRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// `class="..."` contents
    pub fn to_class_attr(&self) -> String {
        self.classes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `style="..."` contents
    pub fn to_style_attr(&self) -> String {
        self.variables
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RenderTarget for StyleRoot {
    fn clear_selectors(&mut self) {
        self.classes.clear();
    }

    fn add_selector(&mut self, selector: &str) {
        self.classes.insert(selector.to_string());
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projector
// ─────────────────────────────────────────────────────────────────────────────

/// Applies snapshots to a render target
#[derive(Debug)]
pub struct ViewProjector<T: RenderTarget> {
    target: T,
    renders: u64,
}

impl<T: RenderTarget> ViewProjector<T> {
    pub fn new(target: T) -> Self {
        Self { target, renders: 0 }
    }

    /// Clear the target and write the projection of `config`
    pub fn render(&mut self, config: &A11yConfig) -> StyleProjection {
        let projection = project(config);

        self.target.clear_selectors();
        for selector in &projection.selectors {
            self.target.add_selector(selector);
        }
        for (name, value) in &projection.variables {
            self.target.set_variable(name, value);
        }

        self.renders += 1;
        tracing::trace!(
            selectors = projection.selectors.len(),
            renders = self.renders,
            "Projected config"
        );
        projection
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

/// Render the current snapshot, then re-render on every change until the
/// store goes away.
pub fn spawn_projector<T>(
    mut updates: watch::Receiver<Arc<A11yConfig>>,
    projector: Arc<Mutex<ViewProjector<T>>>,
) -> JoinHandle<()>
where
    T: RenderTarget + 'static,
{
    tokio::spawn(async move {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            projector
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .render(&snapshot);

            if updates.changed().await.is_err() {
                tracing::debug!("Config store closed, projector stopping");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ConfigStore;
    use crate::model::{Choice, ColorBlindFilter, ContrastTheme, Spacing};
    use crate::profiles::{self, ProfileId};

    #[test]
    fn test_defaults_project_no_selectors() {
        let projection = project(&A11yConfig::default());
        assert!(projection.selectors.is_empty());
        assert_eq!(projection.variables[FONT_SIZE_VAR], "100%");
        assert_eq!(projection.variables[BRIGHTNESS_VAR], "100%");
    }

    #[test]
    fn test_low_vision_projection() {
        let projection = project(&profiles::build(ProfileId::LowVision));
        assert!(projection.selectors.contains("a11y-large-cursor"));
        assert!(projection.selectors.contains("a11y-magnifier"));
        assert!(projection.selectors.contains("a11y-contrast-white-on-black"));
        assert!(projection.selectors.contains("a11y-cursor-yellow"));
        assert_eq!(projection.variables[FONT_SIZE_VAR], "150%");
    }

    #[test]
    fn test_totality() {
        let mut config = A11yConfig::default();
        for &field in ToggleField::ALL {
            config.set_toggle(field, true);
        }
        config.set_choice(Choice::Spacing(Spacing::Wide));
        config.set_choice(Choice::ColorBlind(ColorBlindFilter::Tritanopia));

        let projection = project(&config);
        assert_eq!(projection.selectors.len(), ToggleField::ALL.len() + 2);
        assert!(projection.selectors.contains("a11y-spacing-wide"));
        assert!(projection.selectors.contains("a11y-colorblind-tritanopia"));
        assert!(!projection.selectors.iter().any(|s| s.contains("font-size")));
    }

    #[test]
    fn test_render_is_idempotent() {
        let config = profiles::build(ProfileId::Cognitive);
        let mut projector = ViewProjector::new(StyleRoot::new());

        projector.render(&config);
        let first = projector.target().clone();
        projector.render(&config);

        assert_eq!(*projector.target(), first);
        assert_eq!(projector.renders(), 2);
    }

    #[test]
    fn test_render_leaves_nothing_behind() {
        let c = profiles::build(ProfileId::Motor);
        let mut other = profiles::build(ProfileId::Autism);
        other.set_choice(Choice::Contrast(ContrastTheme::BlackOnYellow));
        other.brightness = 40;

        let mut projector = ViewProjector::new(StyleRoot::new());
        projector.render(&c);
        let original = projector.target().clone();

        projector.render(&other);
        assert!(projector.target().has_class("a11y-contrast-black-on-yellow"));
        assert_eq!(projector.target().variable(BRIGHTNESS_VAR), Some("40%"));

        projector.render(&c);
        assert_eq!(*projector.target(), original);
    }

    #[test]
    fn test_render_erases_foreign_selectors() {
        let mut root = StyleRoot::new();
        root.add_selector("app-dark-mode");
        let mut projector = ViewProjector::new(root);

        projector.render(&A11yConfig::default());
        assert!(!projector.target().has_class("app-dark-mode"));
    }

    #[test]
    fn test_attribute_rendering() {
        let mut projector = ViewProjector::new(StyleRoot::new());
        let mut config = A11yConfig::default();
        config.toggles.bold_text = true;
        config.toggles.captions = true;
        config.font_size = 120;
        projector.render(&config);

        let root = projector.into_target();
        assert_eq!(root.to_class_attr(), "a11y-bold-text a11y-captions");
        assert_eq!(
            root.to_style_attr(),
            "--a11y-brightness: 100%; --a11y-font-size: 120%;"
        );
    }

    #[tokio::test]
    async fn test_projector_task_follows_store() {
        let store = ConfigStore::default();
        let projector = Arc::new(Mutex::new(ViewProjector::new(StyleRoot::new())));
        let task = spawn_projector(store.subscribe(), projector.clone());

        store.replace(Arc::new(profiles::build(ProfileId::Hearing)));
        for _ in 0..50 {
            if projector.lock().unwrap().target().has_class("a11y-captions") {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(projector.lock().unwrap().target().has_class("a11y-captions"));

        drop(store);
        task.await.unwrap();
    }
}
