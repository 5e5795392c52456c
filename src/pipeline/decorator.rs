//! Decorator trait and factory
//!
//! A decorator is one link of a field's chain. Every hook has a default, so a
//! decorator implements only the phases it cares about. Single-winner phases
//! are only consulted for decorators whose [`Decorator::overrides`] names them.

use std::sync::Arc;

use egui::Rect;

use super::context::PhaseContext;
use super::phase::Overrides;
use crate::error::{InspectorError, Result};
use crate::host::InspectorHost;
use crate::model::{downcast, Annotation, AnnotationRef, FieldMeta};
use crate::registry::Binding;

/// One composable rendering behavior attached to a field
#[allow(unused_variables)]
pub trait Decorator: Send + Sync {
    /// Single-winner phases this decorator draws itself
    fn overrides(&self) -> Overrides {
        Overrides::empty()
    }

    /// Adjust flags, heights, labels and offsets for this pass
    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        Ok(())
    }

    /// Inspect or correct the current value before drawing
    fn validate(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        Ok(())
    }

    fn draw_before_extension(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_label_prefix(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        ctx.draw_default_label_prefix(rect, host);
        Ok(())
    }

    fn draw_label(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        ctx.draw_default_label(rect, host);
        Ok(())
    }

    fn draw_sub_body(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        ctx.draw_default_leaf(rect, host)
    }

    fn draw_body(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        ctx.draw_default_body(rect, host)
    }

    fn draw_after_extension(
        &self,
        ctx: &mut PhaseContext<'_, '_>,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> Result<()> {
        Ok(())
    }

    /// Runs after the owning field committed a change
    fn on_changed(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        Ok(())
    }
}

/// What a factory receives when a chain instantiates a decorator
#[derive(Debug, Clone)]
pub struct DecoratorSpec {
    /// Static metadata of the owning field
    pub field: Arc<FieldMeta>,
    /// The annotation this decorator was resolved from; `None` for type-bound
    /// and fallback decorators
    pub annotation: Option<AnnotationRef>,
}

impl DecoratorSpec {
    pub fn new(field: Arc<FieldMeta>, annotation: Option<AnnotationRef>) -> Self {
        Self { field, annotation }
    }

    /// Clone the configuring annotation as `T`
    pub fn annotation<T: Annotation + Clone>(&self, decorator: &'static str) -> Result<T> {
        let annotation = self
            .annotation
            .as_ref()
            .ok_or(InspectorError::AnnotationMismatch {
                decorator,
                annotation: "none",
            })?;
        downcast::<T>(annotation)
            .cloned()
            .ok_or(InspectorError::AnnotationMismatch {
                decorator,
                annotation: annotation.name(),
            })
    }
}

/// Explicit registration of a decorator kind
pub trait DecoratorFactory: Decorator + Sized + 'static {
    /// Kind name used in diagnostics and chain listings
    const NAME: &'static str;

    /// Types and annotations this decorator is bound to
    fn bindings() -> Vec<Binding>;

    /// Build an instance for one field
    fn create(spec: &DecoratorSpec) -> Result<Self>;
}

/// Type-erased constructor stored by the registry
pub type DecoratorCreator = fn(&DecoratorSpec) -> Result<Box<dyn Decorator>>;

pub(crate) fn create_boxed<D: DecoratorFactory>(spec: &DecoratorSpec) -> Result<Box<dyn Decorator>> {
    Ok(Box::new(D::create(spec)?))
}
