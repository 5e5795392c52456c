//! Background tint for a field's controls

use egui::Color32;

use crate::error::Result;
use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
use crate::pipeline::PhaseContext;
use crate::registry::Binding;

/// Named tints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreset {
    Red,
    Green,
    Blue,
    White,
    Black,
    Gray,
    Magenta,
    Yellow,
    Cyan,
    Clear,
}

impl ColorPreset {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            ColorPreset::Red => [1.0, 0.0, 0.0, 1.0],
            ColorPreset::Green => [0.0, 1.0, 0.0, 1.0],
            ColorPreset::Blue => [0.0, 0.0, 1.0, 1.0],
            ColorPreset::White => [1.0, 1.0, 1.0, 1.0],
            ColorPreset::Black => [0.0, 0.0, 0.0, 1.0],
            ColorPreset::Gray => [0.5, 0.5, 0.5, 1.0],
            ColorPreset::Magenta => [1.0, 0.0, 1.0, 1.0],
            ColorPreset::Yellow => [1.0, 0.92, 0.016, 1.0],
            ColorPreset::Cyan => [0.0, 1.0, 1.0, 1.0],
            ColorPreset::Clear => [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Tint the field's controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundColor {
    pub color: [f32; 4],
}

crate::annotation!(BackgroundColor, "BackgroundColor");

impl BackgroundColor {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { color: [r, g, b, a] }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Preset with the given alpha; `Clear` stays fully transparent
    pub fn preset(preset: ColorPreset, alpha: f32) -> Self {
        let mut color = preset.rgba();
        if preset != ColorPreset::Clear {
            color[3] = alpha;
        }
        Self { color }
    }

    pub fn color32(&self) -> Color32 {
        let [r, g, b, a] = self.color.map(channel);
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub struct BackgroundColorDecorator {
    tint: Color32,
}

impl Decorator for BackgroundColorDecorator {
    fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
        ctx.state.tint = Some(self.tint);
        Ok(())
    }
}

impl DecoratorFactory for BackgroundColorDecorator {
    const NAME: &'static str = "BackgroundColor";

    fn bindings() -> Vec<Binding> {
        vec![Binding::of_annotation::<BackgroundColor>()]
    }

    fn create(spec: &DecoratorSpec) -> Result<Self> {
        Ok(Self {
            tint: spec.annotation::<BackgroundColor>(Self::NAME)?.color32(),
        })
    }
}
