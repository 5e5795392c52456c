//! Static field metadata
//!
//! The schema plays the role of source-level declarations: for every record
//! type it lists the fields, their declared types and their annotations in
//! declaration order.

use std::collections::HashMap;
use std::sync::Arc;

use super::annotation::{AnnotationFamily, AnnotationRef};
use super::value::TypeKey;

/// Declared metadata of one field
#[derive(Debug, Clone)]
pub struct FieldMeta {
    pub name: String,
    pub display_name: String,
    pub declared: TypeKey,
    /// Annotations on the field, in declaration order
    pub annotations: Vec<AnnotationRef>,
    /// Annotations applied to each element when the field is a list
    pub element_annotations: Vec<AnnotationRef>,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, declared: TypeKey) -> Self {
        let name = name.into();
        Self {
            display_name: display_name(&name),
            name,
            declared,
            annotations: Vec::new(),
            element_annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationRef) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_element_annotation(mut self, annotation: AnnotationRef) -> Self {
        self.element_annotations.push(annotation);
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Metadata for element `index` of this list field
    pub fn element(&self, index: usize, element_type: TypeKey) -> FieldMeta {
        FieldMeta {
            name: format!("{}[{}]", self.name, index),
            display_name: format!("Element {}", index),
            declared: element_type,
            annotations: self.element_annotations.clone(),
            element_annotations: Vec::new(),
        }
    }

    /// Chain family used to render this field: the family of the first
    /// annotation, rich when there are none
    pub fn family(&self) -> AnnotationFamily {
        self.annotations
            .first()
            .map(|annotation| annotation.family())
            .unwrap_or(AnnotationFamily::Rich)
    }
}

/// Turn `max_speed` into `Max Speed`
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field declarations per record type
#[derive(Debug, Default)]
pub struct Schema {
    types: HashMap<String, Vec<Arc<FieldMeta>>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the fields of a record type; replaces any earlier declaration
    pub fn declare(&mut self, type_name: impl Into<String>, fields: Vec<FieldMeta>) -> &mut Self {
        self.types
            .insert(type_name.into(), fields.into_iter().map(Arc::new).collect());
        self
    }

    pub fn fields(&self, type_name: &str) -> Option<&[Arc<FieldMeta>]> {
        self.types.get(type_name).map(Vec::as_slice)
    }

    pub fn field(&self, type_name: &str, field: &str) -> Option<Arc<FieldMeta>> {
        self.fields(type_name)?
            .iter()
            .find(|meta| meta.name == field)
            .cloned()
    }
}
