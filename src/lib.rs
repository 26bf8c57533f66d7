// a11y-sync - accessibility preference engine
//
// Architecture:
// - Model: the single preference record (toggles, choices, clamped numbers)
// - Profiles: static presets layered onto the default record
// - Engine: pure mutations plus an owned store with subscribe/notify
// - Persistence: local cache on every change, debounced remote sync per identity
// - Projection: snapshot -> style selectors and variables, clear-then-rebuild
// - Config/logging/cli: the host around the engine

pub mod cli;
pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod profiles;
pub mod projection;

pub use engine::{apply, Applied, ConfigStore, FeedbackPulse, HapticSink, LogHaptics, Mutation};
pub use model::A11yConfig;
pub use persistence::{Identity, PersistenceCoordinator};
pub use profiles::ProfileId;
pub use projection::{project, StyleProjection, ViewProjector};
