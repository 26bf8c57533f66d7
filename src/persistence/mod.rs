//! Persistence: local cache, remote record, identity lifecycle
//!
//! The local cache is written on every mutation and is the durable fallback
//! for this device. The remote record follows through a debounced writer once
//! hydration has finished and an identity is linked. Nothing in here surfaces
//! an error to callers; failures degrade to local-only operation.

pub mod cache;
pub mod coordinator;
pub mod debounce;
pub mod identity;
pub mod remote;


pub use cache::{CacheError, FileCache, LocalCache, MemoryCache};
pub use coordinator::{PersistenceCoordinator, Phase};
pub use debounce::Debouncer;
pub use identity::{identity_channel, Identity, IdentityFeed, IdentitySender, IdentityState};
pub use remote::{create_remote, DisabledRemote, HttpRemoteStore, RemoteError, RemoteRecord, RemoteStore};
