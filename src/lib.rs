//! Propdeck core library
//!
//! A field inspector for nested data trees. Every field is laid out and drawn
//! by a chain of decorators chosen from its runtime type and its annotations,
//! over a fixed sequence of layout and draw phases.

// Public modules
pub mod config;
pub mod constants;
pub mod decorators;
pub mod error;
pub mod host;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod registry;

// Re-export commonly used types
pub use config::InspectorConfig;
pub use error::{InspectorError, Result};
pub use host::{EguiHost, InspectorHost, RecordingHost};
pub use layout::{LayoutState, Regions};
pub use model::{
    Annotation, AnnotationFamily, AnnotationRef, DataAccess, FieldMeta, NodePath, Schema, TypeKey, Value,
    ValueTree,
};
pub use pipeline::{Decorator, DecoratorFactory, DecoratorSpec, Diagnostic, Inspector, PassReport, Phase};
pub use registry::{Binding, DecoratorRegistry, TypeRegistry};
