//! Data access over the inspected tree
//!
//! [`DataAccess`] is the seam between the inspector core and a concrete data
//! model. [`ValueTree`] is the bundled implementation over [`Value`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::path::{NodePath, PathSegment};
use super::schema::{FieldMeta, Schema};
use super::value::{TypeKey, Value};
use crate::error::{InspectorError, Result};

/// Read/write access to one inspected object graph
pub trait DataAccess {
    /// Current value at `path`
    fn get(&self, path: &NodePath) -> Option<&Value>;

    /// Overwrite the value at `path`; the change is staged until [`DataAccess::commit`]
    fn set(&mut self, path: &NodePath, value: Value) -> Result<()>;

    /// Static metadata of the field at `path`
    fn field_meta(&self, path: &NodePath) -> Option<Arc<FieldMeta>>;

    /// Declared (static) type of the field at `path`
    fn declared_type(&self, path: &NodePath) -> Option<TypeKey> {
        self.field_meta(path).map(|meta| meta.declared.clone())
    }

    /// Child paths of a composite node, in display order
    fn members(&self, path: &NodePath) -> Vec<NodePath>;

    fn has_children(&self, path: &NodePath) -> bool {
        !self.members(path).is_empty()
    }

    fn is_expanded(&self, path: &NodePath) -> bool;

    fn set_expanded(&mut self, path: &NodePath, expanded: bool);

    /// Apply staged changes at `path` to the underlying object
    fn commit(&mut self, path: &NodePath) -> Result<()>;

    /// Invoke a named method on the record at `owner`
    fn invoke(&mut self, owner: &NodePath, method: &str) -> Result<()>;
}

/// Method callable from a button
pub type Method = Box<dyn Fn(&mut Value) -> std::result::Result<(), String> + Send + Sync>;

/// Commit validation hook; returning `Err` rejects the change
pub type CommitHook = Box<dyn FnMut(&NodePath, &Value) -> std::result::Result<(), String> + Send>;

/// In-memory inspected object backed by a [`Value`] and a [`Schema`]
pub struct ValueTree {
    root: Value,
    schema: Arc<Schema>,
    expanded: HashSet<NodePath>,
    methods: HashMap<(String, String), Method>,
    commit_hook: Option<CommitHook>,
    revision: u64,
}

impl ValueTree {
    pub fn new(root: Value, schema: Arc<Schema>) -> Self {
        Self {
            root,
            schema,
            expanded: HashSet::new(),
            methods: HashMap::new(),
            commit_hook: None,
            revision: 0,
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of successful commits
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a method callable on records of `type_name`
    pub fn register_method(
        &mut self,
        type_name: impl Into<String>,
        method: impl Into<String>,
        body: impl Fn(&mut Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    ) {
        self.methods
            .insert((type_name.into(), method.into()), Box::new(body));
    }

    pub fn set_commit_hook(
        &mut self,
        hook: impl FnMut(&NodePath, &Value) -> std::result::Result<(), String> + Send + 'static,
    ) {
        self.commit_hook = Some(Box::new(hook));
    }
}

fn resolve<'a>(root: &'a Value, path: &NodePath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Field(name) => current.field(name)?,
            PathSegment::Index(index) => current.item(*index)?,
        };
    }
    Some(current)
}

fn resolve_mut<'a>(root: &'a mut Value, path: &NodePath) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Field(name) => current.field_mut(name)?,
            PathSegment::Index(index) => current.item_mut(*index)?,
        };
    }
    Some(current)
}

impl DataAccess for ValueTree {
    fn get(&self, path: &NodePath) -> Option<&Value> {
        resolve(&self.root, path)
    }

    fn set(&mut self, path: &NodePath, value: Value) -> Result<()> {
        let slot = resolve_mut(&mut self.root, path)
            .ok_or_else(|| InspectorError::InvalidPath(path.to_string()))?;
        *slot = value;
        Ok(())
    }

    fn field_meta(&self, path: &NodePath) -> Option<Arc<FieldMeta>> {
        let value = self.get(path)?;
        let Some(parent) = path.parent() else {
            return Some(Arc::new(FieldMeta::new("root", value.type_key())));
        };

        match path.last()? {
            PathSegment::Field(name) => {
                let owner = self.get(&parent)?;
                let declared = match owner {
                    Value::Record { type_key, .. } => self.schema.field(&type_key.name, name),
                    _ => None,
                };
                Some(declared.unwrap_or_else(|| Arc::new(FieldMeta::new(name.clone(), value.type_key()))))
            }
            PathSegment::Index(index) => {
                let element_type = match self.get(&parent)? {
                    Value::List { element, .. } => element.clone(),
                    _ => value.type_key(),
                };
                let list_meta = self.field_meta(&parent)?;
                Some(Arc::new(list_meta.element(*index, element_type)))
            }
        }
    }

    fn members(&self, path: &NodePath) -> Vec<NodePath> {
        match self.get(path) {
            Some(Value::Record { fields, .. }) => {
                fields.iter().map(|(name, _)| path.field(name.clone())).collect()
            }
            Some(Value::List { items, .. }) => (0..items.len()).map(|i| path.index(i)).collect(),
            _ => Vec::new(),
        }
    }

    fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.contains(path)
    }

    fn set_expanded(&mut self, path: &NodePath, expanded: bool) {
        if expanded {
            self.expanded.insert(path.clone());
        } else {
            self.expanded.remove(path);
        }
    }

    fn commit(&mut self, path: &NodePath) -> Result<()> {
        let value = self
            .get(path)
            .cloned()
            .ok_or_else(|| InspectorError::InvalidPath(path.to_string()))?;
        if let Some(hook) = self.commit_hook.as_mut() {
            hook(path, &value).map_err(|reason| InspectorError::CommitRejected {
                path: path.to_string(),
                reason,
            })?;
        }
        self.revision += 1;
        debug!("Committed `{}` (revision {})", path, self.revision);
        Ok(())
    }

    fn invoke(&mut self, owner: &NodePath, method: &str) -> Result<()> {
        let not_found = || InspectorError::MethodNotFound {
            owner: owner.to_string(),
            method: method.to_string(),
        };
        let target = resolve_mut(&mut self.root, owner).ok_or_else(not_found)?;
        let type_name = match target {
            Value::Record { type_key, .. } => type_key.name.clone(),
            _ => return Err(not_found()),
        };
        let body = self
            .methods
            .get(&(type_name, method.to_string()))
            .ok_or_else(not_found)?;
        body(target).map_err(|reason| InspectorError::CommitRejected {
            path: owner.to_string(),
            reason,
        })
    }
}
