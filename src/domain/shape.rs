//! Record shape: the server-side projection applied to every matched document
//!
//! A [`RecordShape`] describes which derived fields ("relations") to compute
//! next to each document. Adapters compile it into their own query language;
//! nothing executable crosses the process boundary.

use serde::{Deserialize, Serialize};

/// A derived field resolved by following a reference stored in the document
///
/// # Examples
///
/// ```
/// use fauna_dump::domain::shape::RelationSpec;
///
/// // author_name = Get(doc.data.author).data.name
/// let spec = RelationSpec::new("author_name", ["data", "author"], ["data", "name"]);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Output field name
    pub name: String,

    /// Path, inside the document, to the reference to follow
    pub ref_path: Vec<String>,

    /// Path, inside the referenced document, of the value to keep.
    /// Empty keeps the whole referenced document.
    #[serde(default)]
    pub select: Vec<String>,
}

impl RelationSpec {
    /// Create a relation spec
    pub fn new<R, S>(name: impl Into<String>, ref_path: R, select: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            name: name.into(),
            ref_path: ref_path.into_iter().map(Into::into).collect(),
            select: select.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates the relation
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("relation name cannot be empty".to_string());
        }
        if self.ref_path.is_empty() {
            return Err(format!("relation '{}' has an empty ref_path", self.name));
        }
        if self
            .ref_path
            .iter()
            .chain(self.select.iter())
            .any(|segment| segment.is_empty())
        {
            return Err(format!("relation '{}' has an empty path segment", self.name));
        }
        Ok(())
    }
}

/// Per-document projection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordShape {
    /// Derived fields, emitted after the document fields in this order
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
}

impl RecordShape {
    /// The default shape: the document alone, no relations
    pub fn document_only() -> Self {
        Self::default()
    }

    /// Add a relation
    pub fn with_relation(mut self, relation: RelationSpec) -> Self {
        self.relations.push(relation);
        self
    }

    /// Validates every relation and rejects duplicate names
    pub fn validate(&self) -> Result<(), String> {
        for (i, relation) in self.relations.iter().enumerate() {
            relation.validate()?;
            if self.relations[..i].iter().any(|r| r.name == relation.name) {
                return Err(format!("duplicate relation name '{}'", relation.name));
            }
        }
        Ok(())
    }
}
