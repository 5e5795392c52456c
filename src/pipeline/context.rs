//! Per-pass environment and the context handed to decorator phases

use std::fmt;

use egui::Rect;
use log::warn;

use super::editor::{DrawOutcome, NestedEditors};
use super::phase::Phase;
use crate::config::InspectorConfig;
use crate::error::{InspectorError, Result};
use crate::host::InspectorHost;
use crate::layout::{DecoratorId, LayoutState};
use crate::model::{DataAccess, FieldMeta, NodePath, Value};
use crate::registry::{DecoratorRegistry, TypeRegistry};

/// A failure reported during a pass; the pass itself continues
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub path: NodePath,
    /// Decorator kind the failure is attributed to
    pub decorator: &'static str,
    pub phase: Phase,
    pub error: InspectorError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed in {} at `{}`: {}", self.decorator, self.phase.name(), self.path, self.error)
    }
}

/// Everything a pass shares across nodes
pub struct Env<'e> {
    pub access: &'e mut dyn DataAccess,
    pub registry: &'e DecoratorRegistry,
    pub types: &'e TypeRegistry,
    pub config: &'e InspectorConfig,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'e> Env<'e> {
    pub fn new(
        access: &'e mut dyn DataAccess,
        registry: &'e DecoratorRegistry,
        types: &'e TypeRegistry,
        config: &'e InspectorConfig,
    ) -> Self {
        Self {
            access,
            registry,
            types,
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, path: &NodePath, decorator: &'static str, phase: Phase, error: InspectorError) {
        let diagnostic = Diagnostic {
            path: path.clone(),
            decorator,
            phase,
            error,
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// View of one node for one decorator during one phase
pub struct PhaseContext<'a, 'e> {
    path: &'a NodePath,
    field: &'a FieldMeta,
    /// Layout state of the node for the current pass
    pub state: &'a mut LayoutState,
    env: &'a mut Env<'e>,
    nested: &'a mut NestedEditors,
    decorator: DecoratorId,
    source: &'static str,
    changed: bool,
}

impl<'a, 'e> PhaseContext<'a, 'e> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        path: &'a NodePath,
        field: &'a FieldMeta,
        state: &'a mut LayoutState,
        env: &'a mut Env<'e>,
        nested: &'a mut NestedEditors,
        decorator: DecoratorId,
        source: &'static str,
    ) -> Self {
        Self {
            path,
            field,
            state,
            env,
            nested,
            decorator,
            source,
            changed: false,
        }
    }

    pub fn path(&self) -> &NodePath {
        self.path
    }

    /// Static metadata of the field being drawn
    pub fn field(&self) -> &FieldMeta {
        self.field
    }

    pub fn decorator_id(&self) -> DecoratorId {
        self.decorator
    }

    pub fn config(&self) -> &InspectorConfig {
        self.env.config
    }

    pub fn types(&self) -> &TypeRegistry {
        self.env.types
    }

    pub fn access(&self) -> &dyn DataAccess {
        &*self.env.access
    }

    /// Whether this phase changed the node's value
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn value(&self) -> Option<&Value> {
        self.env.access.get(self.path)
    }

    pub fn value_or_err(&self) -> Result<&Value> {
        self.value()
            .ok_or_else(|| InspectorError::InvalidPath(self.path.to_string()))
    }

    /// Write the node's value; a no-op when it is unchanged
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        let path = self.path;
        self.set_value_at(path, value)
    }

    /// Write a value at this node or below it
    pub fn set_value_at(&mut self, path: &NodePath, value: Value) -> Result<()> {
        if self.env.access.get(path) == Some(&value) {
            return Ok(());
        }
        self.env.access.set(path, value)?;
        self.changed = true;
        Ok(())
    }

    /// Error for a node value of the wrong shape
    pub fn type_mismatch(&self, expected: &'static str) -> InspectorError {
        InspectorError::TypeMismatch {
            path: self.path.to_string(),
            expected,
            found: self.value().map_or("nothing", Value::kind).to_string(),
        }
    }

    /// Resolve a path relative to the node's parent
    pub fn sibling_path(&self, relative: &str) -> Result<NodePath> {
        let unresolved = || InspectorError::UnresolvedPath {
            field: self.field.name.clone(),
            annotation: self.source,
            path: relative.to_string(),
        };
        let path = self.path.sibling(relative).map_err(|_| unresolved())?;
        if self.env.access.get(&path).is_none() {
            return Err(unresolved());
        }
        Ok(path)
    }

    /// Value of a sibling field
    pub fn sibling(&self, relative: &str) -> Result<&Value> {
        let path = self.sibling_path(relative)?;
        self.env
            .access
            .get(&path)
            .ok_or_else(|| InspectorError::InvalidPath(path.to_string()))
    }

    /// Call a method on the record that owns this node
    pub fn invoke_on_owner(&mut self, method: &str) -> Result<()> {
        let owner = self.path.parent().unwrap_or_default();
        self.env.access.invoke(&owner, method)?;
        self.changed = true;
        Ok(())
    }

    /// Expand or collapse the node, updating this pass's body flag
    pub fn set_expanded(&mut self, expanded: bool) {
        self.env.access.set_expanded(self.path, expanded);
        self.state.expanded = expanded;
        self.state.has_body = self.state.has_children && expanded;
    }

    pub fn persistent<T: 'static>(&self) -> Option<&T> {
        self.state.persistent::<T>(self.decorator)
    }

    pub fn set_persistent<T: 'static>(&mut self, value: T) {
        self.state.set_persistent(self.decorator, value);
    }

    /// Height of any node, computed through its own editor
    pub fn measure(&mut self, path: &NodePath) -> f32 {
        self.nested.height(path, self.env)
    }

    /// Combined height of `owner`'s members
    pub fn members_height(&mut self, owner: &NodePath) -> f32 {
        self.nested.members_height(owner, self.env)
    }

    /// Draw `owner`'s members stacked in `rect`
    pub fn draw_members(
        &mut self,
        owner: &NodePath,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> DrawOutcome {
        let outcome = self.nested.draw_members(owner, rect, self.env, host);
        if outcome.committed {
            self.changed = true;
        }
        outcome
    }

    pub fn draw_default_label_prefix(&mut self, rect: Rect, host: &mut dyn InspectorHost) {
        host.label(rect, &self.state.label_prefix);
    }

    pub fn draw_default_label(&mut self, rect: Rect, host: &mut dyn InspectorHost) {
        host.label(rect, &self.state.label);
    }

    /// Host leaf editor for the node's own value
    pub fn draw_default_leaf(&mut self, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        let mut value = self.value_or_err()?.clone();
        if host.leaf_editor(rect, self.path, &mut value) {
            self.set_value(value)?;
        }
        Ok(())
    }

    /// Members for a composite, the leaf editor otherwise
    pub fn draw_default_body(&mut self, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
        if self.env.access.has_children(self.path) {
            let path = self.path;
            self.draw_members(path, rect, host);
            Ok(())
        } else {
            self.draw_default_leaf(rect, host)
        }
    }
}
