#![forbid(unsafe_code)]

//! Pure domain for the learning-progress store: entities, slice state,
//! intents, reducers and selectors. Nothing in this crate performs I/O.

pub mod catalog;
pub mod model;
pub mod seed;
pub mod selectors;
pub mod state;
pub mod time;

pub use catalog::{CatalogCourse, CourseCatalog, StaticCatalog};
pub use state::{AppState, Intent, Slice, SliceSet};
pub use time::Clock;
