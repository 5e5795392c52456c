//! Inspected data model - paths, values, annotations and the access seam

pub mod annotation;
pub mod path;
pub mod schema;
pub mod tree;
pub mod value;

pub use annotation::{downcast, Annotation, AnnotationFamily, AnnotationKey, AnnotationRef};
pub use path::{NodePath, PathSegment};
pub use schema::{FieldMeta, Schema};
pub use tree::{DataAccess, ValueTree};
pub use value::{TypeKey, Value};
