use crate::error::Result;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::registry::Binding;

pub const NAME: &str = "Passthrough";

/// Adds nothing; every phase uses the structural default
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughDecorator;

impl Decorator for PassthroughDecorator {}

impl DecoratorFactory for PassthroughDecorator {
    const NAME: &'static str = NAME;

    fn bindings() -> Vec<Binding> {
        Vec::new()
    }

    fn create(_spec: &DecoratorSpec) -> Result<Self> {
        Ok(PassthroughDecorator)
    }
}

pub fn boxed() -> Box<dyn Decorator> {
    Box::new(PassthroughDecorator)
}
