//! Store operations
//!
//! A [`ChangeSet`] is the ordered list of writes that brings the variable
//! store in line with the current scope tree. It is applied as one unit.

use pkgmgr_vars::Variable;
use serde::{Deserialize, Serialize};

/// One store operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ChangeOp {
    /// Insert or overwrite a variable
    Persist(Variable),
    /// Remove the variable stored under `id`
    Delete {
        /// Storage key
        id: String,
    },
}

impl ChangeOp {
    /// Storage key this operation targets
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Persist(variable) => &variable.id,
            Self::Delete { id } => id,
        }
    }
}

/// Ordered store operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    ops: Vec<ChangeOp>,
}

impl ChangeSet {
    /// Create empty change set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a persist
    pub fn persist(&mut self, variable: Variable) {
        self.ops.push(ChangeOp::Persist(variable));
    }

    /// Queue a delete
    pub fn delete(&mut self, id: impl Into<String>) {
        self.ops.push(ChangeOp::Delete { id: id.into() });
    }

    /// Append every operation from `other`
    pub fn extend(&mut self, other: ChangeSet) {
        self.ops.extend(other.ops);
    }

    /// Operations in order
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    /// Number of operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when there is nothing to apply
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Variables queued for persisting
    pub fn persisted(&self) -> impl Iterator<Item = &Variable> {
        self.ops.iter().filter_map(|op| match op {
            ChangeOp::Persist(variable) => Some(variable),
            ChangeOp::Delete { .. } => None,
        })
    }

    /// Ids queued for deletion
    pub fn deleted_ids(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            ChangeOp::Delete { id } => Some(id.as_str()),
            ChangeOp::Persist(_) => None,
        })
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeOp;
    type IntoIter = std::vec::IntoIter<ChangeOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeOp;
    type IntoIter = std::slice::Iter<'a, ChangeOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
