//! Declarative field annotations
//!
//! Annotations are immutable configuration objects attached to fields in a
//! [`Schema`](super::schema::Schema). The decorator registry keys
//! annotation-bound decorators by the annotation's concrete Rust type.

use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Which chain engine an annotation participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationFamily {
    /// Full phase set, re-entrancy guard, enable and tint overrides
    Rich,
    /// Reduced phase set without validation or guard
    Simple,
}

/// Core annotation trait; concrete annotations are plain structs
pub trait Annotation: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Human-readable annotation name for diagnostics
    fn name(&self) -> &'static str;

    fn family(&self) -> AnnotationFamily {
        AnnotationFamily::Rich
    }

    fn key(&self) -> AnnotationKey {
        AnnotationKey {
            id: self.as_any().type_id(),
            name: self.name(),
        }
    }
}

/// Shared handle to an annotation instance
pub type AnnotationRef = Arc<dyn Annotation>;

/// Identity of an annotation type
#[derive(Debug, Clone, Copy)]
pub struct AnnotationKey {
    id: TypeId,
    name: &'static str,
}

impl AnnotationKey {
    pub fn of<T: Annotation>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for AnnotationKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnnotationKey {}

impl Hash for AnnotationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Downcast an annotation handle to its concrete type
pub fn downcast<T: Annotation>(annotation: &AnnotationRef) -> Option<&T> {
    annotation.as_any().downcast_ref::<T>()
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Implements [`Annotation`] for a struct
#[macro_export]
macro_rules! annotation {
    ($ty:ty, $name:literal) => {
        $crate::annotation!($ty, $name, $crate::model::AnnotationFamily::Rich);
    };
    ($ty:ty, $name:literal, $family:expr) => {
        impl $crate::model::Annotation for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn name(&self) -> &'static str {
                $name
            }

            fn family(&self) -> $crate::model::AnnotationFamily {
                $family
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Marker;
    crate::annotation!(Marker, "Marker");

    #[derive(Debug)]
    struct Quiet;
    crate::annotation!(Quiet, "Quiet", AnnotationFamily::Simple);

    #[test]
    fn test_instance_key_matches_type_key() {
        let marker: AnnotationRef = Arc::new(Marker);
        assert_eq!(marker.key(), AnnotationKey::of::<Marker>());
        assert_ne!(marker.key(), AnnotationKey::of::<Quiet>());
        assert_eq!(AnnotationKey::of::<Marker>().name(), "Marker");
    }

    #[test]
    fn test_family_and_downcast() {
        let quiet: AnnotationRef = Arc::new(Quiet);
        assert_eq!(quiet.family(), AnnotationFamily::Simple);
        assert!(downcast::<Quiet>(&quiet).is_some());
        assert!(downcast::<Marker>(&quiet).is_none());
    }
}
