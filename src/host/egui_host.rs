//! egui implementation of the host primitives
//!
//! The pipeline works in absolute rectangles, so every primitive is placed
//! with a child `Ui` bounded to its rect rather than using egui's flow layout.

use egui::{Align2, Color32, FontId, Rect, Sense, Ui, UiBuilder};

use super::InspectorHost;
use crate::model::{NodePath, TypeKey, Value};

/// Host drawing into an egui `Ui`
pub struct EguiHost<'a> {
    ui: &'a mut Ui,
    enabled: bool,
    tint: Option<Color32>,
}

impl<'a> EguiHost<'a> {
    pub fn new(ui: &'a mut Ui) -> Self {
        let enabled = ui.is_enabled();
        Self {
            ui,
            enabled,
            tint: None,
        }
    }

    /// Run `add` in a child ui bounded to `rect` with the current enable/tint state
    fn scoped<R>(&mut self, rect: Rect, add: impl FnOnce(&mut Ui) -> R) -> R {
        let mut builder = UiBuilder::new().max_rect(rect);
        if !self.enabled {
            builder = builder.disabled();
        }
        let tint = self.tint;
        self.ui
            .scope_builder(builder, |ui| {
                if let Some(tint) = tint {
                    let widgets = &mut ui.visuals_mut().widgets;
                    widgets.inactive.weak_bg_fill = tint;
                    widgets.inactive.bg_fill = tint;
                    widgets.hovered.weak_bg_fill = tint;
                }
                add(ui)
            })
            .inner
    }
}

impl InspectorHost for EguiHost<'_> {
    fn label(&mut self, rect: Rect, text: &str) {
        if rect.width() <= 0.0 {
            return;
        }
        self.scoped(rect, |ui| {
            ui.put(rect, egui::Label::new(text).truncate());
        });
    }

    fn foldout(&mut self, rect: Rect, path: &NodePath, expanded: bool) -> bool {
        self.scoped(rect, |ui| {
            let id = ui.make_persistent_id(("propdeck_foldout", path.to_string()));
            let response = ui.interact(rect, id, Sense::click());
            let icon = if expanded { "⏷" } else { "⏵" };
            ui.painter().text(
                egui::pos2(rect.min.x + 2.0, rect.center().y),
                Align2::LEFT_CENTER,
                icon,
                FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
            if response.clicked() {
                !expanded
            } else {
                expanded
            }
        })
    }

    fn leaf_editor(&mut self, rect: Rect, _path: &NodePath, value: &mut Value) -> bool {
        if rect.width() <= 0.0 {
            return false;
        }
        self.scoped(rect, |ui| match value {
            Value::Bool(b) => ui.put(rect, egui::Checkbox::without_text(b)).changed(),
            Value::Int(i) => ui.put(rect, egui::DragValue::new(i)).changed(),
            Value::Float(f) => ui.put(rect, egui::DragValue::new(f).speed(0.1)).changed(),
            Value::String(s) => ui.put(rect, egui::TextEdit::singleline(s)).changed(),
            Value::Color(rgba) => ui.color_edit_button_rgba_unmultiplied(rgba).changed(),
            Value::Null => {
                ui.put(rect, egui::Label::new(egui::RichText::new("None").weak()));
                false
            }
            Value::List { items, .. } => {
                ui.put(rect, egui::Label::new(egui::RichText::new(format!("{} items", items.len())).weak()));
                false
            }
            Value::Record { type_key, .. } => {
                ui.put(rect, egui::Label::new(egui::RichText::new(type_key.to_string()).weak()));
                false
            }
        })
    }

    fn button(&mut self, rect: Rect, text: &str) -> bool {
        self.scoped(rect, |ui| ui.put(rect, egui::Button::new(text)).clicked())
    }

    fn type_picker(
        &mut self,
        rect: Rect,
        path: &NodePath,
        current: Option<&TypeKey>,
        options: &[TypeKey],
    ) -> Option<TypeKey> {
        self.scoped(rect, |ui| {
            let mut picked = None;
            let selected = current
                .map(ToString::to_string)
                .unwrap_or_else(|| "None".to_string());
            egui::ComboBox::from_id_salt(("propdeck_type", path.to_string()))
                .selected_text(selected)
                .width(rect.width())
                .show_ui(ui, |ui| {
                    for option in options {
                        let is_current = current == Some(option);
                        if ui.selectable_label(is_current, option.to_string()).clicked() && !is_current {
                            picked = Some(option.clone());
                        }
                    }
                });
            picked
        })
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn tint(&self) -> Option<Color32> {
        self.tint
    }

    fn set_tint(&mut self, tint: Option<Color32>) {
        self.tint = tint;
    }
}
