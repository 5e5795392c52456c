//! Polymorphic reference fields
//!
//! A `Reference<Base, Target>` record holds one value under `value`. The
//! sub-body is a type picker over the registered subtypes of `Target`, and the
//! body draws the held value's members in place of the wrapper's own.

use egui::Rect;

use crate::error::{InspectorError, Result};
use crate::host::InspectorHost;
use crate::model::{NodePath, TypeKey, Value};
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::{Overrides, PhaseContext};
use crate::registry::Binding;

pub const REFERENCE_TYPE: &str = "Reference";
const VALUE_FIELD: &str = "value";

pub fn reference_type(base: TypeKey, target: TypeKey) -> TypeKey {
    TypeKey::generic(REFERENCE_TYPE, vec![base, target])
}

/// Wrap `held` in a reference record; `Value::Null` for an empty reference
pub fn reference(base: TypeKey, target: TypeKey, held: Value) -> Value {
    Value::Record {
        type_key: reference_type(base, target),
        fields: vec![(VALUE_FIELD.to_string(), held)],
    }
}

pub struct ReferenceDecorator;

impl ReferenceDecorator {
    fn held_path(ctx: &PhaseContext<'_, '_>) -> NodePath {
        ctx.path().field(VALUE_FIELD)
    }

    fn target_type(ctx: &PhaseContext<'_, '_>) -> Result<TypeKey> {
        let declared = &ctx.field().declared;
        declared
            .arg(1)
            .or_else(|| ctx.value().and_then(|value| match value {
                Value::Record { type_key, .. } => type_key.arg(1),
                _ => None,
            }))
            .cloned()
            .ok_or_else(|| ctx.type_mismatch("Reference<_, _>"))
    }
}

impl Decorator for ReferenceDecorator {
    fn overrides(&self) -> Overrides {
        Overrides::SUB_BODY | Overrides::BODY
    }

    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        let held = Self::held_path(ctx);
        let has_members = ctx.access().has_children(&held);
        let body_height = if has_members { ctx.members_height(&held) } else { 0.0 };

        ctx.state.has_children = has_members;
        ctx.state.has_foldout = has_members;
        ctx.state.has_sub_body = true;
        ctx.state.body_height = body_height;
        ctx.state.has_body = has_members && ctx.state.expanded;
        Ok(())
    }

    fn draw_sub_body(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        let held = Self::held_path(ctx);
        let target = Self::target_type(ctx)?;
        let options = ctx.types().subtypes_of(&target).to_vec();
        let current = match ctx.access().get(&held) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.type_key()),
        };

        if let Some(picked) = host.type_picker(rect, ctx.path(), current.as_ref(), &options) {
            if !options.contains(&picked) {
                return Err(InspectorError::UnknownType(picked.to_string()));
            }
            let value = ctx.types().instantiate(&picked)?;
            ctx.set_value_at(&held, value)?;
        }
        Ok(())
    }

    fn draw_body(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        let held = Self::held_path(ctx);
        ctx.draw_members(&held, rect, host);
        Ok(())
    }
}

impl DecoratorFactory for ReferenceDecorator {
    const NAME: &'static str = "Reference";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_type(TypeKey::open(REFERENCE_TYPE, 2))]
    }

    fn create(_spec: &DecoratorSpec) -> Result<Self> {
        Ok(ReferenceDecorator)
    }
}
