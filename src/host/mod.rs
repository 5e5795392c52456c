//! Host drawing primitives consumed by the pipeline
//!
//! The core never talks to a UI toolkit directly. It computes rectangles and
//! asks the host to draw labels, toggles and leaf editors into them.

pub mod egui_host;
pub mod recording;

use egui::{Color32, Rect};

use crate::model::{NodePath, TypeKey, Value};

pub use egui_host::EguiHost;
pub use recording::{DrawCommand, RecordingHost};

/// Drawing surface for field editors
pub trait InspectorHost {
    /// Draw static text
    fn label(&mut self, rect: Rect, text: &str);

    /// Draw an expand/collapse toggle; returns the new expanded state
    fn foldout(&mut self, rect: Rect, path: &NodePath, expanded: bool) -> bool;

    /// Draw an editor for a leaf value; returns true when the user changed it
    fn leaf_editor(&mut self, rect: Rect, path: &NodePath, value: &mut Value) -> bool;

    /// Draw a button; returns true when clicked
    fn button(&mut self, rect: Rect, text: &str) -> bool;

    /// Draw a type selector; returns the newly picked type, if any
    fn type_picker(
        &mut self,
        rect: Rect,
        path: &NodePath,
        current: Option<&TypeKey>,
        options: &[TypeKey],
    ) -> Option<TypeKey>;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Current background tint; `None` means the toolkit default
    fn tint(&self) -> Option<Color32>;

    fn set_tint(&mut self, tint: Option<Color32>);
}
