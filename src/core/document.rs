/// Identifier-addressed access into nested JSON documents.
///
/// Animation-pattern documents are trees of arrays whose elements are told
/// apart by an `id` field (`atoms[id=LipSyncPattern].storables[id=AnimationPattern]`).
/// An [`IdPath`] names such a record once, and resolves it against any document.
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("missing field `{field}` at {at}")]
    MissingField { field: String, at: String },
    #[error("field `{field}` at {at} is not an array")]
    NotAnArray { field: String, at: String },
    #[error("no record with id `{id}` in `{field}` at {at}")]
    IdNotFound {
        field: String,
        id: String,
        at: String,
    },
    #[error("record at {at} is not an object")]
    NotAnObject { at: String },
    #[error("record at {at} has an unexpected shape: {source}")]
    Shape {
        at: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One step of an [`IdPath`]: the array field to descend into and the `id`
/// of the element to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdStep {
    pub field: String,
    pub id: String,
}

/// A path of `(field, id)` steps from the document root to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdPath {
    steps: Vec<IdStep>,
}

impl IdPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the path with the element of array `field` whose `id` is `id`.
    pub fn child(mut self, field: &str, id: &str) -> Self {
        self.steps.push(IdStep {
            field: field.to_string(),
            id: id.to_string(),
        });
        self
    }

    /// Find the record this path names.
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value, DocumentError> {
        let mut current = root;
        for (depth, step) in self.steps.iter().enumerate() {
            let at = self.display_prefix(depth);
            let items = current
                .get(&step.field)
                .ok_or_else(|| DocumentError::MissingField {
                    field: step.field.clone(),
                    at: at.clone(),
                })?
                .as_array()
                .ok_or_else(|| DocumentError::NotAnArray {
                    field: step.field.clone(),
                    at: at.clone(),
                })?;
            current = items
                .iter()
                .find(|item| has_id(item, &step.id))
                .ok_or_else(|| DocumentError::IdNotFound {
                    field: step.field.clone(),
                    id: step.id.clone(),
                    at,
                })?;
        }
        Ok(current)
    }

    /// Mutable counterpart of [`IdPath::resolve`].
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, DocumentError> {
        let mut current = root;
        for (depth, step) in self.steps.iter().enumerate() {
            let at = self.display_prefix(depth);
            let items = current
                .get_mut(&step.field)
                .ok_or_else(|| DocumentError::MissingField {
                    field: step.field.clone(),
                    at: at.clone(),
                })?
                .as_array_mut()
                .ok_or_else(|| DocumentError::NotAnArray {
                    field: step.field.clone(),
                    at: at.clone(),
                })?;
            current = items
                .iter_mut()
                .find(|item| has_id(item, &step.id))
                .ok_or_else(|| DocumentError::IdNotFound {
                    field: step.field.clone(),
                    id: step.id.clone(),
                    at,
                })?;
        }
        Ok(current)
    }

    /// Resolve the record and deserialize it into `T`.
    pub fn extract<T: DeserializeOwned>(&self, root: &Value) -> Result<T, DocumentError> {
        let record = self.resolve(root)?;
        T::deserialize(record).map_err(|source| DocumentError::Shape {
            at: self.to_string(),
            source,
        })
    }

    /// Replace field `field` of the record this path names.
    ///
    /// The record must already exist; the field is created if absent.
    pub fn set_field(&self, root: &mut Value, field: &str, value: Value) -> Result<(), DocumentError> {
        let at = self.to_string();
        let record = self
            .resolve_mut(root)?
            .as_object_mut()
            .ok_or(DocumentError::NotAnObject { at })?;
        record.insert(field.to_string(), value);
        Ok(())
    }

    fn display_prefix(&self, depth: usize) -> String {
        IdPath {
            steps: self.steps[..depth].to_vec(),
        }
        .to_string()
    }
}

impl fmt::Display for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}[id={}]", step.field, step.id)?;
        }
        Ok(())
    }
}

fn has_id(item: &Value, id: &str) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
}
