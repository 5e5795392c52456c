//! Per-node layout state
//!
//! A `LayoutState` is reset at the start of every height query, mutated by the
//! decorators' `modify_layout` phase in chain order, and then consulted by the
//! draw call of the same pass.

use egui::Color32;

use super::store::{DecoratorId, PersistentStore};
use crate::config::InspectorConfig;

/// Enable override for a node's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnableState {
    /// Inherit the surrounding enable state
    #[default]
    Enabled,
    /// Disabled unless the surroundings are already disabled
    Disabled,
    /// Enabled even inside a disabled parent
    ForceEnabled,
    /// Disabled regardless of the parent
    ForceDisabled,
}

impl EnableState {
    /// Effective enable flag given the inherited one
    pub fn resolve(self, inherited: bool) -> bool {
        match self {
            EnableState::Enabled => inherited,
            EnableState::Disabled | EnableState::ForceDisabled => false,
            EnableState::ForceEnabled => true,
        }
    }
}

/// Intrinsic shape of a node, measured before decorators run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeShape {
    /// Node has members and is taller than a single line when expanded
    pub has_children: bool,
    pub expanded: bool,
    /// Combined height of the members (or one line for a leaf)
    pub body_height: f32,
    pub is_array_element: bool,
}

/// Geometry, visibility and presentation of one node for the current pass
#[derive(Debug, Default)]
pub struct LayoutState {
    pub draw_node: bool,
    pub force_break: bool,

    pub has_before_extension: bool,
    pub has_foldout: bool,
    pub has_label: bool,
    pub has_sub_body: bool,
    pub has_body: bool,
    pub has_after_extension: bool,
    pub draw_sub_body_when_collapsed: bool,

    pub expanded: bool,
    pub has_children: bool,
    pub is_array_element: bool,

    pub before_extension_height: f32,
    pub label_height: f32,
    pub body_height: f32,
    pub after_extension_height: f32,
    pub offset_y: f32,
    pub offset_x: f32,
    pub indent: i32,
    pub foldout_indent: i32,
    /// One line of controls; the floor for a node with a foldout
    pub line_height: f32,

    pub label: String,
    pub label_prefix: String,
    pub label_prefix_width: f32,
    /// `None` inherits the surrounding tint
    pub tint: Option<Color32>,
    pub enable_state: EnableState,

    /// Height returned by the last completed query
    pub last_height: f32,

    store: PersistentStore,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute baseline flags and heights; keeps the persistent store
    pub fn reset(&mut self, shape: &NodeShape, label: &str, config: &InspectorConfig) {
        self.draw_node = true;
        self.force_break = false;

        self.expanded = shape.expanded;
        self.has_children = shape.has_children;
        self.is_array_element = shape.is_array_element;

        self.has_before_extension = false;
        self.has_foldout = shape.has_children;
        self.has_label = true;
        self.has_sub_body = !shape.has_children;
        self.has_body = shape.has_children && shape.expanded;
        self.has_after_extension = false;
        self.draw_sub_body_when_collapsed = true;

        self.before_extension_height = 0.0;
        self.label_height = config.line_height;
        self.body_height = if shape.has_children { shape.body_height } else { 0.0 };
        self.after_extension_height = 0.0;
        self.offset_y = 0.0;
        self.offset_x = 0.0;
        self.indent = 0;
        self.foldout_indent = 0;
        self.line_height = config.line_height;

        self.label.clear();
        self.label.push_str(label);
        self.label_prefix.clear();
        self.label_prefix_width = 0.0;
        self.tint = None;
        self.enable_state = EnableState::Enabled;
    }

    pub fn should_draw_sub_body(&self) -> bool {
        self.has_sub_body
            && !self.force_break
            && (self.expanded || !self.has_foldout || self.draw_sub_body_when_collapsed)
    }

    pub fn should_draw_body(&self) -> bool {
        self.has_body && !self.force_break && (self.expanded || !self.has_foldout)
    }

    pub fn should_draw_label_prefix(&self) -> bool {
        !self.label_prefix.is_empty() && self.label_prefix_width > 0.0
    }

    /// Total height the node needs for this pass
    pub fn total_height(&self) -> f32 {
        if !self.draw_node {
            return 0.0;
        }

        let mut height = 0.0;
        if self.has_before_extension {
            height += self.before_extension_height;
        }
        if self.has_label || self.should_draw_sub_body() {
            height += self.label_height;
        }
        if self.should_draw_body() {
            height += self.body_height;
        }
        if self.has_after_extension {
            height += self.after_extension_height;
        }

        if self.has_foldout && height == 0.0 {
            height = self.line_height;
        }

        height + self.offset_y
    }

    /// Hide every region of the node; the foldout line still reserves space
    pub fn hide_property_field(&mut self) {
        self.has_label = false;
        self.has_sub_body = false;
        self.has_body = false;
        self.has_foldout = false;
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistentStore {
        &mut self.store
    }

    pub fn persistent<T: 'static>(&self, owner: DecoratorId) -> Option<&T> {
        self.store.get::<T>(owner)
    }

    pub fn set_persistent<T: 'static>(&mut self, owner: DecoratorId, value: T) {
        self.store.set(owner, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InspectorConfig {
        InspectorConfig::default()
    }

    fn leaf() -> NodeShape {
        NodeShape {
            has_children: false,
            expanded: false,
            body_height: 18.0,
            is_array_element: false,
        }
    }

    fn composite(expanded: bool) -> NodeShape {
        NodeShape {
            has_children: true,
            expanded,
            body_height: 60.0,
            is_array_element: false,
        }
    }

    #[test]
    fn test_leaf_defaults() {
        let mut state = LayoutState::new();
        state.reset(&leaf(), "Speed", &config());
        assert!(!state.has_foldout);
        assert!(!state.has_body);
        assert!(state.has_sub_body);
        assert!(state.has_label);
        assert_eq!(state.label, "Speed");
        assert_eq!(state.total_height(), config().line_height);
    }

    #[test]
    fn test_collapsed_composite_is_one_line() {
        let mut state = LayoutState::new();
        state.reset(&composite(false), "Stats", &config());
        assert!(state.has_foldout);
        assert!(!state.has_body);
        assert_eq!(state.total_height(), config().line_height);
    }

    #[test]
    fn test_expanded_composite_adds_body() {
        let mut state = LayoutState::new();
        state.reset(&composite(true), "Stats", &config());
        assert!(state.has_body);
        assert_eq!(state.total_height(), config().line_height + 60.0);
    }

    #[test]
    fn test_foldout_never_collapses_to_zero() {
        let mut state = LayoutState::new();
        state.reset(&composite(false), "Stats", &config());
        state.has_label = false;
        state.has_sub_body = false;
        state.has_body = false;
        assert_eq!(state.total_height(), config().line_height);

        state.has_foldout = false;
        assert_eq!(state.total_height(), 0.0);
    }

    #[test]
    fn test_derived_flags_never_exceed_base_flags() {
        let mut state = LayoutState::new();
        for bits in 0u32..64 {
            state.reset(&composite(bits & 1 != 0), "x", &config());
            state.has_sub_body = bits & 2 != 0;
            state.has_body = bits & 4 != 0;
            state.has_foldout = bits & 8 != 0;
            state.force_break = bits & 16 != 0;
            state.draw_sub_body_when_collapsed = bits & 32 != 0;
            if state.should_draw_body() {
                assert!(state.has_body);
            }
            if state.should_draw_sub_body() {
                assert!(state.has_sub_body);
            }
            if state.force_break {
                assert!(!state.should_draw_body() && !state.should_draw_sub_body());
            }
        }
    }

    #[test]
    fn test_hidden_node_has_no_height() {
        let mut state = LayoutState::new();
        state.reset(&composite(true), "Stats", &config());
        state.draw_node = false;
        assert_eq!(state.total_height(), 0.0);
    }

    #[test]
    fn test_reset_clears_force_break_but_keeps_store() {
        let mut state = LayoutState::new();
        let owner = DecoratorId::new();
        state.set_persistent(owner, 5usize);
        state.reset(&leaf(), "a", &config());
        state.force_break = true;
        state.reset(&leaf(), "a", &config());
        assert!(!state.force_break);
        assert_eq!(state.persistent::<usize>(owner), Some(&5));
    }

    #[test]
    fn test_enable_state_resolution() {
        assert!(EnableState::Enabled.resolve(true));
        assert!(!EnableState::Enabled.resolve(false));
        assert!(!EnableState::Disabled.resolve(true));
        assert!(EnableState::ForceEnabled.resolve(false));
        assert!(!EnableState::ForceDisabled.resolve(true));
    }

    #[test]
    fn test_offsets_and_extensions_add_up() {
        let mut state = LayoutState::new();
        state.reset(&leaf(), "a", &config());
        state.has_before_extension = true;
        state.before_extension_height = 10.0;
        state.has_after_extension = true;
        state.after_extension_height = 5.0;
        state.offset_y = 3.0;
        assert_eq!(state.total_height(), 10.0 + config().line_height + 5.0 + 3.0);
    }
}
