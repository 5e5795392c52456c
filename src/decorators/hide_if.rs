//! Conditional visibility

use crate::error::{InspectorError, Result};
use crate::model::Value;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::PhaseContext;
use crate::registry::Binding;

/// Hide the field while a sibling bool is true
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideIf {
    pub bool_path: String,
}

crate::annotation!(HideIf, "HideIf");

impl HideIf {
    pub fn new(bool_path: impl Into<String>) -> Self {
        Self {
            bool_path: bool_path.into(),
        }
    }
}

pub struct HideIfDecorator {
    bool_path: String,
}

impl Decorator for HideIfDecorator {
    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        let hidden = match ctx.sibling(&self.bool_path)? {
            Value::Bool(hidden) => *hidden,
            other => {
                return Err(InspectorError::TypeMismatch {
                    path: self.bool_path.clone(),
                    expected: "bool",
                    found: other.kind().to_string(),
                })
            }
        };
        ctx.state.draw_node = !hidden;
        Ok(())
    }
}

impl DecoratorFactory for HideIfDecorator {
    const NAME: &'static str = "HideIf";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<HideIf>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        let HideIf { bool_path } = spec.annotation::<HideIf>(Self::NAME)?;
        Ok(Self { bool_path })
    }
}
