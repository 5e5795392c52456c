//! Radians stored, degrees edited

use std::f64::consts::TAU;

use egui::Rect;

use crate::error::{InspectorError, Result};
use crate::host::InspectorHost;
use crate::model::{TypeKey, Value};
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::{Overrides, PhaseContext};
use crate::registry::Binding;

/// Edit a float field holding radians in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AngleToRad;

crate::annotation!(AngleToRad, "AngleToRad");

/// A full turn is stored as exactly 2π
pub fn degrees_to_radians(degrees: f64) -> f64 {
    if degrees == 360.0 {
        TAU
    } else {
        degrees.to_radians()
    }
}

pub struct AngleToRadDecorator;

impl Decorator for AngleToRadDecorator {
    fn overrides(&self) -> Overrides {
        Overrides::SUB_BODY
    }

    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        ctx.state.label = format!("{}°", ctx.state.label.replace("Rad", "Angle"));
        Ok(())
    }

    fn draw_sub_body(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        let radians = ctx
            .value_or_err()?
            .as_float()
            .ok_or_else(|| ctx.type_mismatch("float"))?;
        let mut degrees = Value::Float(radians.to_degrees());
        if host.leaf_editor(rect, ctx.path(), &mut degrees) {
            let degrees = degrees.as_float().ok_or_else(|| ctx.type_mismatch("float"))?;
            ctx.set_value(Value::Float(degrees_to_radians(degrees)))?;
        }
        Ok(())
    }
}

impl DecoratorFactory for AngleToRadDecorator {
    const NAME: &'static str = "AngleToRad";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<AngleToRad>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        if spec.field.declared != TypeKey::float() {
            return Err(InspectorError::TypeMismatch {
                path: spec.field.name.clone(),
                expected: "float",
                found: spec.field.declared.to_string(),
            });
        }
        Ok(AngleToRadDecorator)
    }
}
