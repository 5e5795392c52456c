//! Node paths through the inspected tree
//!
//! A path is a sequence of tagged segments rather than a string, so array
//! indices never have to be re-parsed at use sites. The textual form
//! `a.b[2].c` is only used at the edges (annotations, logs).

use std::fmt;

use crate::error::{InspectorError, Result};

/// One step of a path: a named field or a list index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }
}

/// Stable address of a node relative to the inspected root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The inspected root itself
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse `a.b[2].c` (also accepts `a.b.2` for indices)
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        if text.is_empty() {
            return Ok(Self { segments });
        }

        for part in text.split('.') {
            if part.is_empty() {
                return Err(InspectorError::InvalidPath(text.to_string()));
            }

            let (name, mut rest) = match part.find('[') {
                Some(open) => (&part[..open], &part[open..]),
                None => (part, ""),
            };

            if !name.is_empty() {
                match name.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) => segments.push(PathSegment::field(name)),
                }
            } else if rest.is_empty() {
                return Err(InspectorError::InvalidPath(text.to_string()));
            }

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| InspectorError::InvalidPath(text.to_string()))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| InspectorError::InvalidPath(text.to_string()))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(InspectorError::InvalidPath(text.to_string()));
                }
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Path of the enclosing node; `None` for the root
    pub fn parent(&self) -> Option<NodePath> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    pub fn child(&self, segment: PathSegment) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn field(&self, name: impl Into<String>) -> NodePath {
        self.child(PathSegment::field(name))
    }

    pub fn index(&self, index: usize) -> NodePath {
        self.child(PathSegment::Index(index))
    }

    pub fn join(&self, relative: &NodePath) -> NodePath {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self { segments }
    }

    /// Resolve a path written relative to this node's owner (its siblings)
    pub fn sibling(&self, relative: &str) -> Result<NodePath> {
        let relative = NodePath::parse(relative)?;
        Ok(self.parent().unwrap_or_default().join(&relative))
    }

    /// Index of this node inside its list, if it is a list element
    pub fn element_index(&self) -> Option<usize> {
        match self.segments.last() {
            Some(PathSegment::Index(index)) => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields_and_indices() {
        let path = NodePath::parse("stats.items[2].name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::field("stats"),
                PathSegment::field("items"),
                PathSegment::Index(2),
                PathSegment::field("name"),
            ]
        );
        assert_eq!(path.to_string(), "stats.items[2].name");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(NodePath::parse("a..b").is_err());
        assert!(NodePath::parse("a[x]").is_err());
        assert!(NodePath::parse("a[1").is_err());
    }

    #[test]
    fn test_parent_of_element_is_list() {
        let path = NodePath::parse("items[3]").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "items");
        assert_eq!(path.element_index(), Some(3));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_sibling_resolves_against_owner() {
        let path = NodePath::parse("weapon.damage").unwrap();
        let sibling = path.sibling("max_damage").unwrap();
        assert_eq!(sibling.to_string(), "weapon.max_damage");

        let top = NodePath::parse("speed").unwrap();
        assert_eq!(top.sibling("limits.speed").unwrap().to_string(), "limits.speed");
    }
}
