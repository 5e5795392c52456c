//! Upper bound for numeric fields

use crate::error::Result;
use crate::model::Value;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::PhaseContext;
use crate::registry::Binding;

/// Clamp an int or float field to a maximum
///
/// With `max_path` the sibling's value also bounds the field, and the larger
/// of the two bounds applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Maximum {
    pub max_int: i64,
    pub max_float: f64,
    pub max_path: Option<String>,
}

crate::annotation!(Maximum, "Maximum");

impl Maximum {
    pub fn int(max: i64) -> Self {
        Self {
            max_int: max,
            max_float: max as f64,
            max_path: None,
        }
    }

    pub fn float(max: f64) -> Self {
        Self {
            max_int: max as i64,
            max_float: max,
            max_path: None,
        }
    }

    /// Bounded only by a sibling field
    pub fn path(max_path: impl Into<String>) -> Self {
        Self {
            max_int: i64::MIN,
            max_float: f64::NEG_INFINITY,
            max_path: Some(max_path.into()),
        }
    }

    pub fn with_path(mut self, max_path: impl Into<String>) -> Self {
        self.max_path = Some(max_path.into());
        self
    }
}

pub struct MaximumDecorator {
    bound: Maximum,
}

impl MaximumDecorator {
    fn effective_bounds(&self, ctx: &PhaseContext<'_, '_>) -> Result<(i64, f64)> {
        let mut max_int = self.bound.max_int;
        let mut max_float = self.bound.max_float;
        if let Some(max_path) = &self.bound.max_path {
            match ctx.sibling(max_path)? {
                Value::Int(value) => {
                    max_int = max_int.max(*value);
                    max_float = max_float.max(*value as f64);
                }
                Value::Float(value) => {
                    max_int = max_int.max(*value as i64);
                    max_float = max_float.max(*value);
                }
                _ => {}
            }
        }
        Ok((max_int, max_float))
    }
}

impl Decorator for MaximumDecorator {
    fn validate(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        let (max_int, max_float) = self.effective_bounds(ctx)?;
        let current = ctx.value_or_err()?.clone();
        match current {
            Value::Int(value) if value > max_int => ctx.set_value(Value::Int(max_int)),
            Value::Float(value) if value > max_float => ctx.set_value(Value::Float(max_float)),
            _ => Ok(()),
        }
    }
}

impl DecoratorFactory for MaximumDecorator {
    const NAME: &'static str = "Maximum";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<Maximum>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        Ok(Self {
            bound: spec.annotation::<Maximum>(Self::NAME)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::decorators::test_support::Harness;
    use crate::error::InspectorError;
    use crate::model::{FieldMeta, TypeKey};

    #[test]
    fn test_clamps_float() {
        let mut harness = Harness::new(
            "Car",
            vec![FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(Maximum::float(10.0)))],
            vec![("speed", Value::Float(15.0))],
        );
        let report = harness.pass();
        assert_eq!(harness.value("speed"), &Value::Float(10.0));
        assert!(report.outcome.committed);
    }

    #[test]
    fn test_value_under_bound_is_untouched() {
        let mut harness = Harness::new(
            "Car",
            vec![FieldMeta::new("gears", TypeKey::int()).with_annotation(Arc::new(Maximum::int(6)))],
            vec![("gears", Value::Int(5))],
        );
        let report = harness.pass();
        assert_eq!(harness.value("gears"), &Value::Int(5));
        assert!(!report.outcome.changed);
        assert_eq!(harness.tree.revision(), 0);
    }

    #[test]
    fn test_sibling_raises_bound() {
        let mut harness = Harness::new(
            "Car",
            vec![
                FieldMeta::new("limit", TypeKey::int()),
                FieldMeta::new("gears", TypeKey::int()).with_annotation(Arc::new(Maximum::int(4).with_path("limit"))),
            ],
            vec![("limit", Value::Int(8)), ("gears", Value::Int(12))],
        );
        harness.pass();
        assert_eq!(harness.value("gears"), &Value::Int(8));
    }

    #[test]
    fn test_lower_sibling_does_not_tighten_bound() {
        let mut harness = Harness::new(
            "Car",
            vec![
                FieldMeta::new("limit", TypeKey::float()),
                FieldMeta::new("speed", TypeKey::float())
                    .with_annotation(Arc::new(Maximum::float(50.0).with_path("limit"))),
            ],
            vec![("limit", Value::Float(20.0)), ("speed", Value::Float(40.0))],
        );
        harness.pass();
        assert_eq!(harness.value("speed"), &Value::Float(40.0));
    }

    #[test]
    fn test_missing_bound_path_is_reported() {
        let mut harness = Harness::new(
            "Car",
            vec![FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(Maximum::path("nope")))],
            vec![("speed", Value::Float(40.0))],
        );
        let report = harness.pass();
        assert_eq!(harness.value("speed"), &Value::Float(40.0));
        assert!(matches!(
            report.diagnostics[0].error,
            InspectorError::UnresolvedPath { annotation: "Maximum", .. }
        ));
    }
}
