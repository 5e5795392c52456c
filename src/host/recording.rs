//! Headless host that records draw calls
//!
//! Used by tests and by tooling that wants to inspect the layout a pass would
//! produce without a real UI. User input is scripted ahead of time.

use std::collections::{HashMap, HashSet};

use egui::{Color32, Rect};

use super::InspectorHost;
use crate::model::{NodePath, TypeKey, Value};

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Label {
        rect: Rect,
        text: String,
        enabled: bool,
        tint: Option<Color32>,
    },
    Foldout {
        rect: Rect,
        path: NodePath,
        expanded: bool,
    },
    LeafEditor {
        rect: Rect,
        path: NodePath,
        value: Value,
        enabled: bool,
    },
    Button {
        rect: Rect,
        text: String,
    },
    TypePicker {
        rect: Rect,
        path: NodePath,
        current: Option<TypeKey>,
        options: Vec<TypeKey>,
    },
}

/// Host that records every draw call and replays scripted input
#[derive(Debug)]
pub struct RecordingHost {
    pub commands: Vec<DrawCommand>,
    edits: HashMap<NodePath, Value>,
    toggles: HashSet<NodePath>,
    clicks: HashSet<String>,
    picks: HashMap<NodePath, TypeKey>,
    enabled: bool,
    tint: Option<Color32>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            edits: HashMap::new(),
            toggles: HashSet::new(),
            clicks: HashSet::new(),
            picks: HashMap::new(),
            enabled: true,
            tint: None,
        }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next leaf editor drawn for `path` reports `value` as user input
    pub fn script_edit(&mut self, path: NodePath, value: Value) {
        self.edits.insert(path, value);
    }

    /// The next foldout drawn for `path` is clicked
    pub fn script_toggle(&mut self, path: NodePath) {
        self.toggles.insert(path);
    }

    /// The next button with this caption is clicked
    pub fn script_click(&mut self, text: impl Into<String>) {
        self.clicks.insert(text.into());
    }

    /// The next type picker drawn for `path` selects `type_key`
    pub fn script_pick(&mut self, path: NodePath, type_key: TypeKey) {
        self.picks.insert(path, type_key);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Texts of all labels drawn, in order
    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Paths of all leaf editors drawn, in order
    pub fn leaf_paths(&self) -> Vec<&NodePath> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::LeafEditor { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl InspectorHost for RecordingHost {
    fn label(&mut self, rect: Rect, text: &str) {
        self.commands.push(DrawCommand::Label {
            rect,
            text: text.to_string(),
            enabled: self.enabled,
            tint: self.tint,
        });
    }

    fn foldout(&mut self, rect: Rect, path: &NodePath, expanded: bool) -> bool {
        self.commands.push(DrawCommand::Foldout {
            rect,
            path: path.clone(),
            expanded,
        });
        if self.toggles.remove(path) {
            !expanded
        } else {
            expanded
        }
    }

    fn leaf_editor(&mut self, rect: Rect, path: &NodePath, value: &mut Value) -> bool {
        self.commands.push(DrawCommand::LeafEditor {
            rect,
            path: path.clone(),
            value: value.clone(),
            enabled: self.enabled,
        });
        if !self.enabled {
            return false;
        }
        match self.edits.remove(path) {
            Some(edit) if edit != *value => {
                *value = edit;
                true
            }
            _ => false,
        }
    }

    fn button(&mut self, rect: Rect, text: &str) -> bool {
        self.commands.push(DrawCommand::Button {
            rect,
            text: text.to_string(),
        });
        self.enabled && self.clicks.remove(text)
    }

    fn type_picker(
        &mut self,
        rect: Rect,
        path: &NodePath,
        current: Option<&TypeKey>,
        options: &[TypeKey],
    ) -> Option<TypeKey> {
        self.commands.push(DrawCommand::TypePicker {
            rect,
            path: path.clone(),
            current: current.cloned(),
            options: options.to_vec(),
        });
        self.picks.remove(path).filter(|pick| options.contains(pick))
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
