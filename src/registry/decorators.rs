//! Decorator registry
//!
//! Maps runtime value types and annotation types to the decorator kind that
//! handles them. Built once by explicit registration, then read-only.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::OnceCell;

use crate::decorators;
use crate::decorators::passthrough::PassthroughDecorator;
use crate::model::{AnnotationKey, TypeKey};
use crate::pipeline::decorator::{create_boxed, DecoratorCreator, DecoratorFactory};

/// What a decorator kind is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Runtime value type; generic types are registered in open form
    Type(TypeKey),
    Annotation(AnnotationKey),
}

impl Binding {
    pub fn of_type(type_key: TypeKey) -> Self {
        Binding::Type(type_key.definition())
    }

    pub fn of_annotation<A: crate::model::Annotation>() -> Self {
        Binding::Annotation(AnnotationKey::of::<A>())
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Type(type_key) => write!(f, "type {}", type_key),
            Binding::Annotation(key) => write!(f, "annotation {}", key.name()),
        }
    }
}

/// Registered decorator kind
#[derive(Clone, Copy)]
pub struct DecoratorEntry {
    pub name: &'static str,
    pub create: DecoratorCreator,
}

impl fmt::Debug for DecoratorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorEntry").field("name", &self.name).finish()
    }
}

/// A registration that lost to an earlier one for the same binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedBinding {
    pub binding: Binding,
    pub kept: &'static str,
    pub ignored: &'static str,
}

/// Binding table; first registration wins
#[derive(Debug, Default)]
pub struct DecoratorRegistry {
    by_type: HashMap<TypeKey, DecoratorEntry>,
    by_annotation: HashMap<AnnotationKey, DecoratorEntry>,
    shadowed: Vec<ShadowedBinding>,
}

impl DecoratorRegistry {
    /// An empty registry; every node falls back to default rendering
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every bundled decorator
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        decorators::register_builtins(&mut registry);
        debug!(
            "Built decorator registry: {} type bindings, {} annotation bindings",
            registry.by_type.len(),
            registry.by_annotation.len()
        );
        registry
    }

    /// Register every binding declared by `D`
    pub fn register<D: DecoratorFactory>(&mut self) -> &mut Self {
        let entry = DecoratorEntry {
            name: D::NAME,
            create: create_boxed::<D>,
        };
        for binding in D::bindings() {
            self.register_entry(binding, entry);
        }
        self
    }

    /// Insert one binding unless it is already taken
    pub fn register_entry(&mut self, binding: Binding, entry: DecoratorEntry) {
        let existing = match &binding {
            Binding::Type(type_key) => self.by_type.get(&type_key.definition()).copied(),
            Binding::Annotation(key) => self.by_annotation.get(key).copied(),
        };

        if let Some(kept) = existing {
            warn!(
                "Ignoring {} for {}: already bound to {}",
                entry.name, binding, kept.name
            );
            self.shadowed.push(ShadowedBinding {
                binding,
                kept: kept.name,
                ignored: entry.name,
            });
            return;
        }

        debug!("Bound {} to {}", binding, entry.name);
        match binding {
            Binding::Type(type_key) => {
                self.by_type.insert(type_key.definition(), entry);
            }
            Binding::Annotation(key) => {
                self.by_annotation.insert(key, entry);
            }
        }
    }

    /// Decorator bound to a runtime value type, normalized to its open form
    pub fn resolve_type(&self, type_key: &TypeKey) -> Option<DecoratorEntry> {
        self.by_type.get(&type_key.definition()).copied()
    }

    pub fn resolve_annotation(&self, key: AnnotationKey) -> Option<DecoratorEntry> {
        self.by_annotation.get(&key).copied()
    }

    /// Fallback used where no specific decorator is registered
    pub fn passthrough(&self) -> DecoratorEntry {
        DecoratorEntry {
            name: PassthroughDecorator::NAME,
            create: create_boxed::<PassthroughDecorator>,
        }
    }

    /// Registrations ignored because their binding was already taken
    pub fn shadowed(&self) -> &[ShadowedBinding] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_annotation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static GLOBAL: OnceCell<Arc<DecoratorRegistry>> = OnceCell::new();

/// Install the process-wide registry; fails if one was already built
pub fn install_global(registry: DecoratorRegistry) -> Result<(), DecoratorRegistry> {
    let mut pending = Some(registry);
    GLOBAL.get_or_init(|| Arc::new(pending.take().unwrap_or_default()));
    match pending {
        None => Ok(()),
        Some(registry) => Err(registry),
    }
}

/// The process-wide registry, built with the bundled decorators on first use
pub fn global() -> Arc<DecoratorRegistry> {
    GLOBAL
        .get_or_init(|| Arc::new(DecoratorRegistry::with_builtins()))
        .clone()
}
