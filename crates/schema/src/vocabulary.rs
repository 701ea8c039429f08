use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Controlled set of entity and relation type labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub entity_types: BTreeSet<String>,
    pub relation_types: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<E, R>(entity_types: E, relation_types: R) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            entity_types: entity_types.into_iter().map(Into::into).collect(),
            relation_types: relation_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_entity_type(&self, entity_type: &str) -> bool {
        self.entity_types.contains(entity_type)
    }

    pub fn has_relation_type(&self, relation_type: &str) -> bool {
        self.relation_types.contains(relation_type)
    }
}
