use std::sync::Arc;

use egui::{pos2, vec2, Rect};

use crate::config::InspectorConfig;
use crate::host::RecordingHost;
use crate::layout::LayoutState;
use crate::model::{DataAccess, FieldMeta, NodePath, Schema, TypeKey, Value, ValueTree};
use crate::pipeline::{Inspector, PassReport};
use crate::registry::{DecoratorRegistry, TypeRegistry};

pub(crate) fn path(text: &str) -> NodePath {
    NodePath::parse(text).unwrap()
}

/// One record type inspected with the bundled decorators
pub(crate) struct Harness {
    pub tree: ValueTree,
    pub inspector: Inspector,
    pub host: RecordingHost,
}

impl Harness {
    pub fn new(type_name: &str, fields: Vec<FieldMeta>, values: Vec<(&str, Value)>) -> Self {
        Self::with_types(type_name, fields, values, TypeRegistry::new())
    }

    pub fn with_types(
        type_name: &str,
        fields: Vec<FieldMeta>,
        values: Vec<(&str, Value)>,
        types: TypeRegistry,
    ) -> Self {
        let mut schema = Schema::new();
        schema.declare(type_name, fields);
        let root = Value::record(TypeKey::named(type_name), values);
        Self {
            tree: ValueTree::new(root, Arc::new(schema)),
            inspector: Inspector::new(
                InspectorConfig::default(),
                Arc::new(DecoratorRegistry::with_builtins()),
                Arc::new(types),
            ),
            host: RecordingHost::new(),
        }
    }

    pub fn height(&mut self) -> f32 {
        self.inspector.height(&mut self.tree)
    }

    /// Height query plus draw, like one frame
    pub fn pass(&mut self) -> PassReport {
        self.inspector.height(&mut self.tree);
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 600.0));
        self.inspector.draw(area, &mut self.tree, &mut self.host)
    }

    pub fn value(&self, at: &str) -> &Value {
        self.tree.get(&path(at)).unwrap()
    }

    pub fn state(&self, at: &str) -> &LayoutState {
        self.inspector.state(&path(at)).unwrap()
    }
}
