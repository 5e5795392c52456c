//! Method buttons next to a field

use egui::{vec2, Rect};

use crate::error::Result;
use crate::host::InspectorHost;
use crate::model::schema::display_name;
use crate::model::AnnotationFamily;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::PhaseContext;
use crate::registry::Binding;

/// A one-line button that calls a method on the record owning the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Caption; the method's display name when `None`
    pub name: Option<String>,
    pub method: String,
    /// Hide the field's label, sub-body, body and foldout
    pub hide_property_field: bool,
    /// Draw above the field rather than below it
    pub draw_before: bool,
}

crate::annotation!(Button, "Button", AnnotationFamily::Simple);

impl Button {
    pub fn new(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            method: method.into(),
            hide_property_field: false,
            draw_before: true,
        }
    }

    pub fn for_method(method: impl Into<String>) -> Self {
        Self {
            name: None,
            ..Self::new("", method)
        }
    }

    pub fn hide_property_field(mut self) -> Self {
        self.hide_property_field = true;
        self
    }

    pub fn after(mut self) -> Self {
        self.draw_before = false;
        self
    }

    pub fn caption(&self) -> String {
        self.name.clone().unwrap_or_else(|| display_name(&self.method))
    }
}

/// Vertical offset of this button inside its extension region
struct Slot(f32);

pub struct ButtonDecorator {
    button: Button,
    caption: String,
}

impl ButtonDecorator {
    fn draw_button(&self, ctx: &mut PhaseContext<'_, '_>, region: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        let offset = ctx.persistent::<Slot>().map_or(0.0, |slot| slot.0);
        let line = ctx.config().line_height;
        let rect = Rect::from_min_size(region.min + vec2(0.0, offset), vec2(region.width(), line));
        if host.button(rect, &self.caption) {
            ctx.invoke_on_owner(&self.button.method)?;
        }
        Ok(())
    }
}

impl Decorator for ButtonDecorator {
    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        let line = ctx.config().line_height;
        let offset = if self.button.draw_before {
            ctx.state.has_before_extension = true;
            let offset = ctx.state.before_extension_height;
            ctx.state.before_extension_height += line;
            offset
        } else {
            ctx.state.has_after_extension = true;
            let offset = ctx.state.after_extension_height;
            ctx.state.after_extension_height += line;
            offset
        };
        ctx.set_persistent(Slot(offset));

        if self.button.hide_property_field {
            ctx.state.hide_property_field();
        }
        Ok(())
    }

    fn draw_before_extension(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        if self.button.draw_before {
            self.draw_button(ctx, rect, host)?;
        }
        Ok(())
    }

    fn draw_after_extension(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        if !self.button.draw_before {
            self.draw_button(ctx, rect, host)?;
        }
        Ok(())
    }
}

impl DecoratorFactory for ButtonDecorator {
    const NAME: &'static str = "Button";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<Button>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        let button = spec.annotation::<Button>(Self::NAME)?;
        let caption = button.caption();
        Ok(Self { button, caption })
    }
}
