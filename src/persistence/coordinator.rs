//! Persistence coordinator
//!
//! Owns the config store and decides where every change goes:
//!
//! ```text
//! mutation ──► engine::apply ──► ConfigStore (subscribers notified)
//!                 │
//!                 ├──► LocalCache     (synchronous, always)
//!                 ├──► HapticSink     (when the transition asks for it)
//!                 └──► Debouncer ──► RemoteStore::store   (hydrated + linked only)
//! ```
//!
//! Identity lifecycle:
//!
//! ```text
//! Anonymous ──identity──► Fetching ──ok──► Linked ──sign-out──► Anonymous
//!                             └──error──► Offline ──sign-out──► Anonymous
//! ```

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cache::{self, LocalCache};
use super::debounce::Debouncer;
use super::identity::{Identity, IdentityFeed, IdentityState};
use super::remote::{RemoteRecord, RemoteStore};
use crate::engine::{self, ConfigStore, HapticSink, Mutation};
use crate::model::{A11yConfig, Choice, NumericField, StepDirection, ToggleField};
use crate::profiles::ProfileId;

/// Startup progress. Remote writes stay off until `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hydrating,
    Ready,
}

#[derive(Debug)]
struct SyncState {
    phase: Phase,
    identity: IdentityState,
}

impl SyncState {
    /// Identity to push to, if a remote write is allowed right now
    fn remote_target(&self) -> Option<Identity> {
        match self.phase {
            Phase::Ready => self.identity.writable().cloned(),
            Phase::Hydrating => None,
        }
    }
}

pub struct PersistenceCoordinator {
    store: ConfigStore,
    cache: Arc<dyn LocalCache>,
    remote: Arc<dyn RemoteStore>,
    haptics: Arc<dyn HapticSink>,
    writer: Debouncer,
    state: Mutex<SyncState>,
}

impl PersistenceCoordinator {
    pub fn new(
        cache: Arc<dyn LocalCache>,
        remote: Arc<dyn RemoteStore>,
        haptics: Arc<dyn HapticSink>,
        debounce: Duration,
    ) -> Self {
        Self {
            store: ConfigStore::default(),
            cache,
            remote,
            haptics,
            writer: Debouncer::new(debounce),
            state: Mutex::new(SyncState {
                phase: Phase::Hydrating,
                identity: IdentityState::Anonymous,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read side
    // ─────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<A11yConfig> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<A11yConfig>> {
        self.store.subscribe()
    }

    /// `true` while loading, so first-run UI is never flashed
    pub fn onboarding_completed(&self) -> bool {
        self.store.onboarding_completed()
    }

    pub fn subscribe_onboarding(&self) -> watch::Receiver<bool> {
        self.store.subscribe_onboarding()
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    pub fn identity_state(&self) -> IdentityState {
        self.lock_state().identity.clone()
    }

    pub fn remote_name(&self) -> &'static str {
        self.remote.name()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hydration and identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Startup sequence: read the cache, then fetch the remote record when an
    /// identity is already known. Remote writes are enabled afterwards.
    pub async fn hydrate(&self, identity: Option<Identity>) {
        let cached = cache::read_cached(self.cache.as_ref());
        let had_cache = cached.config.is_some();
        if let Some(config) = cached.config {
            self.store.replace(Arc::new(config));
        }
        let onboarding = cached.onboarding_completed.unwrap_or(false);
        tracing::info!(cached = had_cache, onboarding, "Loaded local cache");

        match identity {
            Some(id) => self.link(id, onboarding).await,
            None => self.store.set_onboarding(onboarding),
        }

        self.lock_state().phase = Phase::Ready;
        tracing::info!(
            identity = ?self.identity_state(),
            remote = self.remote.name(),
            "Hydration complete"
        );
    }

    /// React to sign-in, sign-out, or a switch between identities
    pub async fn on_identity_change(&self, next: Option<Identity>) {
        let current = self.lock_state().identity.identity().cloned();
        if current == next {
            return;
        }

        if self.writer.cancel() {
            tracing::debug!("Dropped pending remote write for previous identity");
        }

        match next {
            None => {
                self.lock_state().identity = IdentityState::Anonymous;
                tracing::info!("Signed out, continuing with local cache only");
            }
            Some(id) => {
                tracing::info!(identity = %id.short(), "Identity acquired");
                let onboarding = self.store.onboarding_completed();
                self.link(id, onboarding).await;
            }
        }
    }

    /// Follow an identity feed until its sender goes away.
    ///
    /// Intended to be started after `hydrate`; the feed's current value is
    /// reconciled immediately.
    pub fn watch_identity(self: &Arc<Self>, mut feed: IdentityFeed) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let initial = feed.borrow_and_update().clone();
            this.on_identity_change(initial).await;

            while feed.changed().await.is_ok() {
                let next = feed.borrow_and_update().clone();
                this.on_identity_change(next).await;
            }
            tracing::debug!("Identity feed closed");
        })
    }

    /// Fetch the remote record for `id` and merge it over the current state.
    /// `onboarding` is applied when there is nothing remote to take it from.
    async fn link(&self, id: Identity, onboarding: bool) {
        if !self.remote.is_enabled() {
            tracing::debug!(identity = %id.short(), "Remote sync disabled, staying local");
            self.lock_state().identity = IdentityState::Offline(id);
            self.store.set_onboarding(onboarding);
            return;
        }

        self.lock_state().identity = IdentityState::Fetching(id.clone());
        let fetched = self.remote.fetch(&id).await;

        let mut state = self.lock_state();
        if state.identity != IdentityState::Fetching(id.clone()) {
            tracing::debug!(identity = %id.short(), "Identity changed during fetch, discarding result");
            return;
        }

        match fetched {
            Ok(Some(record)) => {
                let current = self.store.snapshot();
                let merged = match record.config.as_ref().and_then(Value::as_object) {
                    Some(overlay) => Arc::new(current.merged_with(overlay)),
                    None => current,
                };
                let completed = record.onboarding_completed.unwrap_or(false);

                self.store.replace(merged.clone());
                self.store.set_onboarding(completed);
                self.write_cache(&merged, Some(completed));

                state.identity = IdentityState::Linked(id.clone());
                tracing::info!(
                    identity = %id.short(),
                    updated_at = ?record.updated_at,
                    profile = ?merged.active_profile,
                    "Applied remote preferences"
                );
            }
            Ok(None) => {
                self.store.set_onboarding(onboarding);
                state.identity = IdentityState::Linked(id.clone());
                tracing::info!(identity = %id.short(), "No remote preferences yet, keeping local state");
            }
            Err(e) => {
                self.store.set_onboarding(onboarding);
                state.identity = IdentityState::Offline(id.clone());
                tracing::warn!(identity = %id.short(), "Failed to load remote preferences: {}", e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle(&self, field: ToggleField) -> Arc<A11yConfig> {
        self.mutate(Mutation::Toggle(field))
    }

    pub fn set_choice(&self, choice: Choice) -> Arc<A11yConfig> {
        self.mutate(Mutation::SetChoice(choice))
    }

    pub fn set_number(&self, field: NumericField, value: f64) -> Arc<A11yConfig> {
        self.mutate(Mutation::SetNumber(field, value))
    }

    pub fn step(&self, field: NumericField, direction: StepDirection) -> Arc<A11yConfig> {
        self.mutate(Mutation::Step(field, direction))
    }

    pub fn activate_profile(&self, id: ProfileId) -> Arc<A11yConfig> {
        self.mutate(Mutation::ActivateProfile(id))
    }

    pub fn reset(&self) -> Arc<A11yConfig> {
        self.mutate(Mutation::Reset)
    }

    /// Apply one mutation and persist the result
    pub fn mutate(&self, mutation: Mutation) -> Arc<A11yConfig> {
        // The state lock serializes mutations so they land in issue order
        let (config, feedback) = {
            let state = self.lock_state();
            let applied = engine::apply(&self.store.snapshot(), mutation);
            self.store.replace(applied.config.clone());
            self.write_cache(&applied.config, None);

            if let Some(id) = state.remote_target() {
                self.schedule_remote_write(id, &applied.config, self.store.onboarding_completed());
            }
            (applied.config, applied.feedback)
        };

        tracing::debug!(?mutation, profile = ?config.active_profile, "Applied mutation");
        if let Some(pulse) = feedback {
            self.haptics.pulse(pulse);
        }
        config
    }

    pub fn complete_onboarding(&self) {
        self.set_onboarding(true);
    }

    /// Set the onboarding flag, persisted like any config mutation
    pub fn set_onboarding(&self, completed: bool) {
        let state = self.lock_state();
        self.store.set_onboarding(completed);
        if let Err(e) = cache::write_onboarding(self.cache.as_ref(), completed) {
            tracing::error!("Failed to write onboarding flag to cache: {}", e);
        }
        if let Some(id) = state.remote_target() {
            self.schedule_remote_write(id, &self.store.snapshot(), completed);
        }
        tracing::debug!(completed, "Onboarding flag updated");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writers
    // ─────────────────────────────────────────────────────────────────────────

    fn write_cache(&self, config: &A11yConfig, onboarding: Option<bool>) {
        if let Err(e) = cache::write_config(self.cache.as_ref(), config) {
            tracing::error!("Failed to write config to cache: {}", e);
        }
        if let Some(completed) = onboarding {
            if let Err(e) = cache::write_onboarding(self.cache.as_ref(), completed) {
                tracing::error!("Failed to write onboarding flag to cache: {}", e);
            }
        }
    }

    fn schedule_remote_write(&self, id: Identity, config: &A11yConfig, onboarding: bool) {
        let record = RemoteRecord::from_state(config, onboarding);
        let remote = Arc::clone(&self.remote);

        self.writer.schedule(async move {
            match remote.store(&id, &record).await {
                Ok(()) => tracing::debug!(identity = %id.short(), "Remote preferences saved"),
                Err(e) => {
                    tracing::error!(identity = %id.short(), "Failed to save remote preferences: {}", e)
                }
            }
        });
    }

    /// Send any pending remote write now and wait for in-flight writes
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Drop any pending remote write. Local state is already persisted.
    pub fn shutdown(&self) {
        if self.writer.cancel() {
            tracing::debug!("Cancelled pending remote write on shutdown");
        }
    }
}

impl std::fmt::Debug for PersistenceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceCoordinator")
            .field("remote", &self.remote.name())
            .field("writer", &self.writer)
            .field("state", &*self.lock_state())
            .finish()
    }
}
