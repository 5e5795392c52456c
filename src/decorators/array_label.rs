//! Index labels for list elements

use egui::Rect;

use crate::error::Result;
use crate::host::InspectorHost;
use crate::model::Value;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::{Overrides, PhaseContext};
use crate::registry::Binding;

/// Label list elements with their index
///
/// Attach as an element annotation of a list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLabel {
    /// Added to the zero-based index
    pub index_offset: i64,
    /// Keep the expand toggle of composite elements
    pub has_foldout: bool,
    /// Show the element's name after the index
    pub has_name: bool,
    pub hide_name_if_expanded: bool,
}

crate::annotation!(ArrayLabel, "ArrayLabel");

impl Default for ArrayLabel {
    fn default() -> Self {
        Self {
            index_offset: 1,
            has_foldout: false,
            has_name: false,
            hide_name_if_expanded: false,
        }
    }
}

impl ArrayLabel {
    pub fn named() -> Self {
        Self {
            has_name: true,
            ..Self::default()
        }
    }
}

/// A record element's `name` field, if it has a non-empty one
fn element_name(value: Option<&Value>) -> Option<String> {
    match value?.field("name")? {
        Value::String(name) if !name.is_empty() => Some(name.clone()),
        _ => None,
    }
}

pub struct ArrayLabelDecorator {
    config: ArrayLabel,
}

impl Decorator for ArrayLabelDecorator {
    fn overrides(&self) -> Overrides {
        Overrides::LABEL
    }

    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        let Some(index) = ctx.path().element_index() else {
            return Ok(());
        };

        ctx.state.label_prefix = (index as i64 + self.config.index_offset).to_string();
        ctx.state.label_prefix_width = ctx.config().label_prefix_width;

        if !self.config.has_foldout && ctx.state.has_children {
            ctx.state.has_foldout = false;
            ctx.set_expanded(true);
        }

        let expanded = ctx.state.expanded && ctx.state.has_children;
        let show_name = self.config.has_name && !(self.config.hide_name_if_expanded && expanded);
        if !show_name {
            ctx.state.label.clear();
        } else if let Some(name) = element_name(ctx.value()) {
            ctx.state.label = name;
        }
        Ok(())
    }

    fn draw_label(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        if !ctx.state.label.is_empty() {
            ctx.draw_default_label(rect, host);
        }
        Ok(())
    }
}

impl DecoratorFactory for ArrayLabelDecorator {
    const NAME: &'static str = "ArrayLabel";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<ArrayLabel>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        Ok(Self {
            config: spec.annotation::<ArrayLabel>(Self::NAME)?,
        })
    }
}
