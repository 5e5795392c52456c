//! Per-field decorator chains

use std::sync::Arc;

use log::debug;

use super::decorators::{DecoratorEntry, DecoratorRegistry};
use crate::error::InspectorError;
use crate::layout::DecoratorId;
use crate::model::{AnnotationFamily, AnnotationRef, FieldMeta, TypeKey};
use crate::pipeline::decorator::{Decorator, DecoratorSpec};

/// How a link entered the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Root,
    TypeBound,
    AnnotationBound,
}

/// One instantiated decorator
pub struct ChainLink {
    pub id: DecoratorId,
    pub kind: &'static str,
    pub role: LinkRole,
    pub annotation: Option<AnnotationRef>,
    decorator: Box<dyn Decorator>,
}

impl ChainLink {
    pub fn decorator(&self) -> &dyn Decorator {
        self.decorator.as_ref()
    }

    /// Name used when attributing errors from this link
    pub fn source(&self) -> &'static str {
        self.annotation.as_ref().map_or(self.kind, |annotation| annotation.name())
    }
}

/// A decorator that could not be built and was replaced by the passthrough
#[derive(Debug, Clone, PartialEq)]
pub struct ChainFailure {
    pub kind: &'static str,
    pub error: InspectorError,
}

/// Root decorator plus ordered members for one field
pub struct DecoratorChain {
    root: ChainLink,
    members: Vec<ChainLink>,
    family: AnnotationFamily,
    built_for: TypeKey,
}

impl DecoratorChain {
    pub fn root(&self) -> &ChainLink {
        &self.root
    }

    pub fn members(&self) -> &[ChainLink] {
        &self.members
    }

    /// Root first, then members in order
    pub fn links(&self) -> impl Iterator<Item = &ChainLink> {
        std::iter::once(&self.root).chain(self.members.iter())
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.links().map(|link| link.kind).collect()
    }

    pub fn family(&self) -> AnnotationFamily {
        self.family
    }

    /// Runtime type the chain was resolved for
    pub fn built_for(&self) -> &TypeKey {
        &self.built_for
    }

    /// Resolved nothing beyond the fallback root
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.root.kind == crate::decorators::passthrough::NAME
    }

    /// Keep the identities of links that survive a rebuild, so persistent
    /// data stays attached to them
    pub fn adopt_ids(&mut self, previous: &DecoratorChain) {
        let previous: Vec<_> = previous.links().map(|link| (link.kind, link.id)).collect();
        let links = std::iter::once(&mut self.root).chain(self.members.iter_mut());
        for (link, (kind, id)) in links.zip(previous) {
            if link.kind == kind {
                link.id = id;
            }
        }
    }
}

/// Builds chains against a registry
pub struct ChainBuilder<'a> {
    registry: &'a DecoratorRegistry,
}

impl<'a> ChainBuilder<'a> {
    pub fn new(registry: &'a DecoratorRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the chain for `field` holding a value of type `runtime`
    ///
    /// The root is the decorator of the first annotation of the field's
    /// family, else the type-bound decorator, else the passthrough. Members
    /// are the type-bound decorator (unless it is already the root kind) and
    /// one decorator per remaining annotation, in declaration order.
    pub fn build(&self, field: &Arc<FieldMeta>, runtime: &TypeKey) -> (DecoratorChain, Vec<ChainFailure>) {
        let family = field.family();
        let annotations: Vec<&AnnotationRef> = field
            .annotations
            .iter()
            .filter(|annotation| annotation.family() == family)
            .collect();
        let type_bound = self.registry.resolve_type(runtime);
        let mut failures = Vec::new();

        let (root_entry, root_annotation) = match annotations.first() {
            Some(first) => (
                self.resolve_or_passthrough(first),
                Some(Arc::clone(*first)),
            ),
            None => (type_bound.unwrap_or_else(|| self.registry.passthrough()), None),
        };
        let root = self.instantiate(field, root_entry, root_annotation, LinkRole::Root, &mut failures);

        let mut members = Vec::new();
        if let Some(entry) = type_bound {
            if entry.name != root_entry.name {
                members.push(self.instantiate(field, entry, None, LinkRole::TypeBound, &mut failures));
            }
        }
        for annotation in annotations.iter().skip(1) {
            let entry = self.resolve_or_passthrough(annotation);
            members.push(self.instantiate(
                field,
                entry,
                Some(Arc::clone(*annotation)),
                LinkRole::AnnotationBound,
                &mut failures,
            ));
        }

        let chain = DecoratorChain {
            root,
            members,
            family,
            built_for: runtime.clone(),
        };
        debug!("Chain for `{}`: {:?}", field.name, chain.kinds());
        (chain, failures)
    }

    fn resolve_or_passthrough(&self, annotation: &AnnotationRef) -> DecoratorEntry {
        self.registry
            .resolve_annotation(annotation.key())
            .unwrap_or_else(|| self.registry.passthrough())
    }

    fn instantiate(
        &self,
        field: &Arc<FieldMeta>,
        entry: DecoratorEntry,
        annotation: Option<AnnotationRef>,
        role: LinkRole,
        failures: &mut Vec<ChainFailure>,
    ) -> ChainLink {
        let spec = DecoratorSpec::new(Arc::clone(field), annotation.clone());
        let (kind, decorator) = match (entry.create)(&spec) {
            Ok(decorator) => (entry.name, decorator),
            Err(error) => {
                failures.push(ChainFailure {
                    kind: entry.name,
                    error,
                });
                let fallback = self.registry.passthrough();
                match (fallback.create)(&spec) {
                    Ok(decorator) => (fallback.name, decorator),
                    Err(_) => (fallback.name, crate::decorators::passthrough::boxed()),
                }
            }
        };
        ChainLink {
            id: DecoratorId::new(),
            kind,
            role,
            annotation,
            decorator,
        }
    }
}
