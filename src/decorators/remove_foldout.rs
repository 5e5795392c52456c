use crate::error::Result;
use crate::model::AnnotationFamily;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::PhaseContext;
use crate::registry::Binding;

/// Always show a composite field's members, without a toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveFoldout;

crate::annotation!(RemoveFoldout, "RemoveFoldout", AnnotationFamily::Simple);

pub struct RemoveFoldoutDecorator;

impl Decorator for RemoveFoldoutDecorator {
    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        ctx.set_expanded(true);
        ctx.state.has_foldout = false;
        Ok(())
    }
}

impl DecoratorFactory for RemoveFoldoutDecorator {
    const NAME: &'static str = "RemoveFoldout";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<RemoveFoldout>()]
    }

    fn create(_spec: &DecoratorSpec) -> Result<Self> {
        Ok(RemoveFoldoutDecorator)
    }
}
