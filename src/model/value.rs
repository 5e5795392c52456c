//! Runtime values and type keys of the inspected tree

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name used for an erased generic argument
pub const OPEN_ARGUMENT: &str = "_";

/// Identity of a value's type, including generic arguments
///
/// `Reference<Shape, Circle>` and `Reference<Shape, Square>` share the open form
/// `Reference<_, _>`, which is what type-bound decorators register against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeKey>,
}

impl TypeKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeKey>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Open generic form with `arity` erased arguments
    pub fn open(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            args: vec![TypeKey::named(OPEN_ARGUMENT); arity],
        }
    }

    pub fn bool() -> Self {
        Self::named("bool")
    }

    pub fn int() -> Self {
        Self::named("int")
    }

    pub fn float() -> Self {
        Self::named("float")
    }

    pub fn string() -> Self {
        Self::named("string")
    }

    pub fn color() -> Self {
        Self::named("color")
    }

    pub fn list(element: TypeKey) -> Self {
        Self::generic("List", vec![element])
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Normalize to the open generic definition; non-generic keys are unchanged
    pub fn definition(&self) -> TypeKey {
        if self.is_generic() {
            TypeKey::open(self.name.clone(), self.args.len())
        } else {
            self.clone()
        }
    }

    pub fn arg(&self, index: usize) -> Option<&TypeKey> {
        self.args.get(index)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A value in the inspected tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Color([f32; 4]),
    List {
        element: TypeKey,
        items: Vec<Value>,
    },
    Record {
        type_key: TypeKey,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    pub fn record(type_key: TypeKey, fields: Vec<(&str, Value)>) -> Self {
        Value::Record {
            type_key,
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    pub fn list(element: TypeKey, items: Vec<Value>) -> Self {
        Value::List { element, items }
    }

    /// Runtime type of this value
    pub fn type_key(&self) -> TypeKey {
        match self {
            Value::Null => TypeKey::named("null"),
            Value::Bool(_) => TypeKey::bool(),
            Value::Int(_) => TypeKey::int(),
            Value::Float(_) => TypeKey::float(),
            Value::String(_) => TypeKey::string(),
            Value::Color(_) => TypeKey::color(),
            Value::List { element, .. } => TypeKey::list(element.clone()),
            Value::Record { type_key, .. } => type_key.clone(),
        }
    }

    /// Short kind name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Color(_) => "color",
            Value::List { .. } => "list",
            Value::Record { .. } => "record",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List { .. } | Value::Record { .. })
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Value::Record { fields, .. } => fields
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn item(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List { items, .. } => items.get(index),
            _ => None,
        }
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Value> {
        match self {
            Value::List { items, .. } => items.get_mut(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_definition_erases_arguments() {
        let concrete = TypeKey::generic("Container", vec![TypeKey::int()]);
        let other = TypeKey::generic("Container", vec![TypeKey::string()]);
        assert_eq!(concrete.definition(), other.definition());
        assert_eq!(concrete.definition().to_string(), "Container<_>");
        assert_eq!(TypeKey::int().definition(), TypeKey::int());
    }

    #[test]
    fn test_record_field_lookup() {
        let value = Value::record(
            TypeKey::named("Stats"),
            vec![("hp", Value::Int(10)), ("alive", Value::Bool(true))],
        );
        assert_eq!(value.field("hp"), Some(&Value::Int(10)));
        assert_eq!(value.field("mana"), None);
        assert_eq!(value.type_key(), TypeKey::named("Stats"));
    }
}
