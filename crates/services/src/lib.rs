#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod persistence;
pub mod store;

pub use learn_core::Clock;

pub use config::StoreConfig;
pub use error::StoreInitError;
pub use handle::LearningHandle;
pub use persistence::SnapshotWriter;
pub use store::{Listener, Store, SubscriptionId};
