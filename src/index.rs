//! Entities index: the shared state of an ontology under construction.
//!
//! Three name-keyed mappings (classes, properties, individuals) with
//! set-union merge semantics: re-adding an existing name unions the new
//! attribute values into the existing record, never overwriting. Records
//! are never deleted. No referential integrity is enforced between records;
//! a class may name absent parents and an individual absent classes, since
//! the model repairs inconsistencies in later turns.
//!
//! The whole index serializes to a single human-readable JSON document with
//! three named sections, and reloads to an identical in-memory state.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// A `(relation, value)` assertion on an individual.
///
/// The value is either a literal string or the name of another individual.
/// Serializes as a two-element JSON array `["relation", "value"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyPair(pub String, pub String);

impl PropertyPair {
    /// Create a pair from a relation name and a value.
    pub fn new(relation: impl Into<String>, value: impl Into<String>) -> Self {
        Self(relation.into(), value.into())
    }

    /// The relation (property) name.
    pub fn relation(&self) -> &str {
        &self.0
    }

    /// The value: a literal or another individual's name.
    pub fn value(&self) -> &str {
        &self.1
    }
}

/// A TBox class: parent classes and free-text role descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Names of parent classes. May reference classes that do not exist.
    #[serde(rename = "subclassOf")]
    pub subclass_of: BTreeSet<String>,
    /// Free-text descriptions of what this class means.
    pub role: BTreeSet<String>,
}

/// A TBox property: free-text role descriptions only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    /// Free-text descriptions of what this property means.
    pub role: BTreeSet<String>,
}

/// An ABox individual: class memberships, property assertions, roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualEntry {
    /// Names of classes this individual belongs to.
    pub classes: BTreeSet<String>,
    /// Property assertions. The same relation may appear with several
    /// values; identical pairs collapse to one.
    pub properties: BTreeSet<PropertyPair>,
    /// Free-text descriptions of what this individual means.
    pub role: BTreeSet<String>,
}

/// Whether a merge created a new record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
}

/// The three entity mappings of an ontology being built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitiesIndex {
    classes: BTreeMap<String, ClassEntry>,
    properties: BTreeMap<String, PropertyEntry>,
    individuals: BTreeMap<String, IndividualEntry>,
}

impl EntitiesIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Merging
    // -----------------------------------------------------------------------

    /// Add a class, or union the given fields into an existing one.
    pub fn merge_class(
        &mut self,
        name: &str,
        parents: impl IntoIterator<Item = String>,
        roles: impl IntoIterator<Item = String>,
    ) -> MergeOutcome {
        match self.classes.entry(name.to_string()) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                let class = entry.get_mut();
                class.subclass_of.extend(parents);
                class.role.extend(roles);
                MergeOutcome::Updated
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(ClassEntry {
                    subclass_of: parents.into_iter().collect(),
                    role: roles.into_iter().collect(),
                });
                MergeOutcome::Created
            }
        }
    }

    /// Add a property, or union the given roles into an existing one.
    pub fn merge_property(
        &mut self,
        name: &str,
        roles: impl IntoIterator<Item = String>,
    ) -> MergeOutcome {
        match self.properties.entry(name.to_string()) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                entry.get_mut().role.extend(roles);
                MergeOutcome::Updated
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(PropertyEntry {
                    role: roles.into_iter().collect(),
                });
                MergeOutcome::Created
            }
        }
    }

    /// Add an individual, or union the given fields into an existing one.
    ///
    /// Property assertions merge as a pair-set: identical `(relation, value)`
    /// pairs collapse, while distinct values for the same relation coexist.
    pub fn merge_individual(
        &mut self,
        name: &str,
        classes: impl IntoIterator<Item = String>,
        properties: impl IntoIterator<Item = PropertyPair>,
        roles: impl IntoIterator<Item = String>,
    ) -> MergeOutcome {
        match self.individuals.entry(name.to_string()) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                let individual = entry.get_mut();
                individual.classes.extend(classes);
                individual.properties.extend(properties);
                individual.role.extend(roles);
                MergeOutcome::Updated
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(IndividualEntry {
                    classes: classes.into_iter().collect(),
                    properties: properties.into_iter().collect(),
                    role: roles.into_iter().collect(),
                });
                MergeOutcome::Created
            }
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The full class mapping.
    pub fn classes(&self) -> &BTreeMap<String, ClassEntry> {
        &self.classes
    }

    /// The full property mapping.
    pub fn properties(&self) -> &BTreeMap<String, PropertyEntry> {
        &self.properties
    }

    /// The full individual mapping.
    pub fn individuals(&self) -> &BTreeMap<String, IndividualEntry> {
        &self.individuals
    }

    /// Class names with their role descriptions only, omitting structure.
    /// A lightweight projection used to keep prompt payloads small.
    pub fn class_summaries(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.classes
            .iter()
            .map(|(name, entry)| (name.clone(), entry.role.clone()))
            .collect()
    }

    /// Property names with their role descriptions only.
    pub fn property_summaries(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.properties
            .iter()
            .map(|(name, entry)| (name.clone(), entry.role.clone()))
            .collect()
    }

    /// Individual names with their role descriptions only.
    pub fn individual_summaries(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.individuals
            .iter()
            .map(|(name, entry)| (name.clone(), entry.role.clone()))
            .collect()
    }

    /// Total number of entities across all three kinds.
    pub fn len(&self) -> usize {
        self.classes.len() + self.properties.len() + self.individuals.len()
    }

    /// Whether the index holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Save the index to a pretty-printed JSON snapshot.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| IndexError::Serialization {
                message: format!("failed to serialize entities index: {e}"),
            })?;
        std::fs::write(path, json).map_err(|e| IndexError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), entities = self.len(), "entities index saved");
        Ok(())
    }

    /// Load an index from a JSON snapshot written by [`EntitiesIndex::save`].
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|e| IndexError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let index: Self =
            serde_json::from_str(&content).map_err(|e| IndexError::Serialization {
                message: format!("failed to deserialize entities index: {e}"),
            })?;
        tracing::info!(path = %path.display(), entities = index.len(), "entities index loaded");
        Ok(index)
    }
}

impl std::fmt::Display for EntitiesIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} classes, {} properties, {} individuals",
            self.classes.len(),
            self.properties.len(),
            self.individuals.len()
        )
    }
}
