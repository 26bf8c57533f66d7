//! Owned configuration store with subscribe/notify
//!
//! The store holds the current snapshot behind an `Arc`. Every replacement is
//! a fresh allocation, so subscribers can detect change with `Arc::ptr_eq`.
//! Only the engine replaces snapshots; everyone else gets read-only handles.

use std::sync::Arc;
use tokio::sync::watch;

use crate::model::A11yConfig;

#[derive(Debug)]
pub struct ConfigStore {
    config: watch::Sender<Arc<A11yConfig>>,
    onboarding: watch::Sender<bool>,
}

impl ConfigStore {
    /// New store. The onboarding flag starts `true` so first-run UI stays
    /// hidden until the real value has loaded.
    pub fn new(initial: A11yConfig) -> Self {
        let (config, _) = watch::channel(Arc::new(initial));
        let (onboarding, _) = watch::channel(true);
        Self { config, onboarding }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<A11yConfig> {
        self.config.borrow().clone()
    }

    /// Follow snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Arc<A11yConfig>> {
        self.config.subscribe()
    }

    pub fn onboarding_completed(&self) -> bool {
        *self.onboarding.borrow()
    }

    pub fn subscribe_onboarding(&self) -> watch::Receiver<bool> {
        self.onboarding.subscribe()
    }

    pub(crate) fn replace(&self, next: Arc<A11yConfig>) {
        self.config.send_replace(next);
    }

    pub(crate) fn set_onboarding(&self, completed: bool) {
        self.onboarding.send_replace(completed);
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(A11yConfig::default())
    }
}
