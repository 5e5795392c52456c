//! Decorator and type registries, and the chains resolved from them

pub mod chain;
pub mod decorators;
pub mod types;

pub use chain::{ChainBuilder, ChainFailure, ChainLink, DecoratorChain, LinkRole};
pub use decorators::{
    global, install_global, Binding, DecoratorEntry, DecoratorRegistry, ShadowedBinding,
};
pub use types::{Constructor, TypeRegistry};
