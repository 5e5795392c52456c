//! Per-node layout model: state, geometry and persistent scratch storage

pub mod regions;
pub mod state;
pub mod store;

pub use regions::Regions;
pub use state::{EnableState, LayoutState, NodeShape};
pub use store::{DecoratorId, PersistentStore};
