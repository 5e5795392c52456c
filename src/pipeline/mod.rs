//! Render pipeline
//!
//! Every node is rendered in two calls per pass: a height query that resets
//! the node's [`LayoutState`](crate::layout::LayoutState) and lets the chain
//! modify it, then a draw call that runs the remaining phases into the
//! rectangle the host allocated from that height.

pub mod context;
pub mod decorator;
pub mod editor;
pub mod guard;
pub mod inspector;
pub mod phase;

pub use context::{Diagnostic, Env, PhaseContext};
pub use decorator::{Decorator, DecoratorCreator, DecoratorFactory, DecoratorSpec};
pub use editor::{DrawOutcome, FieldEditor, NestedEditors};
pub use inspector::{Inspector, PassReport};
pub use phase::{Capabilities, Overrides, Phase};
