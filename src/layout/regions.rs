//! Subdivision of a node's rectangle into its drawing regions

use egui::{pos2, vec2, Rect};

use super::state::LayoutState;
use crate::config::InspectorConfig;

/// Every region a node can draw into; unused regions have zero width or height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regions {
    pub before_extension: Rect,
    pub foldout: Rect,
    pub label_prefix: Rect,
    pub label: Rect,
    pub sub_body: Rect,
    pub body: Rect,
    pub after_extension: Rect,
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect::from_min_size(pos2(x, y), vec2(width.max(0.0), height.max(0.0)))
}

impl Regions {
    /// Lay out `area` for `state`
    ///
    /// Left to right on the first line: foldout toggle, label prefix, label,
    /// sub-body. The body goes on the lines below when the node has a label or
    /// a sub-body, otherwise beside the label.
    pub fn compute(area: Rect, state: &LayoutState, config: &InspectorConfig) -> Self {
        let line = config.line_height;

        let mut position = area;
        position.min.y += state.offset_y;
        position.min.x += state.offset_x + state.indent as f32 * config.indent_width;

        let mut property = position;
        if state.has_before_extension {
            property.min.y += state.before_extension_height;
        }
        if state.has_after_extension {
            property.max.y -= state.after_extension_height;
        }

        let before_extension = if state.has_before_extension {
            rect(position.min.x, position.min.y, position.width(), state.before_extension_height)
        } else {
            rect(position.min.x, position.min.y, 0.0, 0.0)
        };

        let foldout_width = if state.has_foldout { config.foldout_width } else { 0.0 };
        let foldout_x = property.min.x + state.foldout_indent as f32 * config.indent_width;
        let mut foldout = rect(foldout_x, property.min.y, foldout_width, line);

        let prefix_width = if state.should_draw_label_prefix() {
            state.label_prefix_width.min(config.label_width)
        } else {
            0.0
        };
        let label_prefix = rect(property.min.x + foldout_width, property.min.y, prefix_width, line);

        let label_width = if state.has_label {
            (config.label_width - prefix_width).max(0.0)
        } else {
            0.0
        };
        let label = rect(label_prefix.max.x, property.min.y, label_width, line);

        let sub_body = rect(label.max.x, property.min.y, property.max.x - label.max.x, line);

        let body = if state.has_label || state.has_sub_body {
            let indent = if state.has_label { config.indent_width } else { 0.0 };
            rect(
                property.min.x + indent,
                property.min.y + line,
                property.width() - indent,
                property.height() - line,
            )
        } else {
            rect(label.max.x, property.min.y, property.max.x - label.max.x, property.height())
        };

        let after_extension = if state.has_after_extension {
            rect(position.min.x, property.max.y, position.width(), state.after_extension_height)
        } else {
            rect(position.min.x, property.max.y, 0.0, 0.0)
        };

        // The toggle is clickable across the whole label column.
        if state.has_foldout {
            foldout.max.x = foldout.max.x.max(label.max.x);
        }

        Self {
            before_extension,
            foldout,
            label_prefix,
            label,
            sub_body,
            body,
            after_extension,
        }
    }
}
