use chrono::Utc;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use ingest::RawSource;
use schema::{
    is_valid_document_id, new_id, CharIndex, Direction, Document, DocumentSummary, Entity,
    Relation, Vocabulary,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::persist::JsonDirectory;

/// Values filled in when a caller leaves an optional field out.
#[derive(Debug, Clone)]
pub struct AnnotationDefaults {
    pub annotator: String,
}

impl Default for AnnotationDefaults {
    fn default() -> Self {
        Self {
            annotator: "anon".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEntity {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub annotator: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRelation {
    pub source_entity_id: String,
    pub target_entity_id: String,
    pub relation_type: String,
    /// `"forward"` or `"reverse"`; forward when absent.
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub annotator: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub documents: usize,
    pub entities: usize,
    pub relations: usize,
}

/// In-memory documents mirrored to one JSON file each.
///
/// Documents are hydrated from disk on first access. Every mutation holds the
/// document's map entry while it writes the file, and only replaces the
/// in-memory copy once the write succeeded.
pub struct DocumentStore {
    docs: DashMap<String, Document>,
    files: JsonDirectory,
    vocabulary: Vocabulary,
    defaults: AnnotationDefaults,
}

impl DocumentStore {
    pub fn new(
        files: JsonDirectory,
        vocabulary: Vocabulary,
        defaults: AnnotationDefaults,
    ) -> Self {
        Self {
            docs: DashMap::new(),
            files,
            vocabulary,
            defaults,
        }
    }

    pub fn open(
        dir: impl AsRef<Path>,
        vocabulary: Vocabulary,
        defaults: AnnotationDefaults,
    ) -> Result<Self> {
        let files = JsonDirectory::open(dir.as_ref())?;
        Ok(Self::new(files, vocabulary, defaults))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn defaults(&self) -> &AnnotationDefaults {
        &self.defaults
    }

    /// Populate the store from raw text files.
    ///
    /// A document already in memory is reused, a persisted JSON file is loaded
    /// as-is, and only otherwise is a fresh document created from the raw text
    /// and saved. Running it again never resets annotations.
    pub fn bootstrap(&self, sources: &[RawSource]) -> Result<Vec<Document>> {
        let mut covered = Vec::with_capacity(sources.len());
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut created = 0;

        for source in sources {
            let id = source.document_id();

            if let Some(first) = seen.get(&id) {
                warn!(
                    doc_id = %id,
                    first = %first,
                    duplicate = %source.name,
                    "Raw sources map to the same document id, keeping the first"
                );
                continue;
            }
            seen.insert(id.clone(), &source.name);

            // The entry guard is held across load and save so a concurrent
            // create or import of the same id cannot interleave.
            let doc = match self.docs.entry(id.clone()) {
                MapEntry::Occupied(slot) => slot.get().clone(),
                MapEntry::Vacant(slot) => {
                    let doc = match self.files.load(&id) {
                        Ok(Some(doc)) => doc,
                        Ok(None) => {
                            let doc = Document::new(id.clone(), source.core_text());
                            self.files.save(&doc)?;
                            created += 1;
                            doc
                        }
                        Err(err) => {
                            warn!(
                                doc_id = %id,
                                error = %err,
                                "Skipping source with unreadable persisted document"
                            );
                            continue;
                        }
                    };
                    slot.insert(doc).value().clone()
                }
            };
            covered.push(doc);
        }

        info!(
            sources = sources.len(),
            loaded = covered.len(),
            created,
            "Bootstrap complete"
        );
        Ok(covered)
    }

    /// Summaries of every loaded document, ordered by id.
    pub fn list_documents(&self) -> Vec<DocumentSummary> {
        let mut summaries: Vec<DocumentSummary> =
            self.docs.iter().map(|doc| doc.value().summary()).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Full copies of every loaded document, ordered by id.
    pub fn all_documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.docs.iter().map(|doc| doc.value().clone()).collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        docs
    }

    pub fn create_document(&self, new: NewDocument) -> Result<Document> {
        let id = new.id.unwrap_or_else(new_id);
        if !is_valid_document_id(&id) {
            return Err(StoreError::Validation(format!(
                "document id '{}' must be 1-128 characters from [A-Za-z0-9._-]",
                id
            )));
        }

        match self.docs.entry(id.clone()) {
            MapEntry::Occupied(_) => Err(StoreError::Conflict(id)),
            MapEntry::Vacant(slot) => {
                if self.files.exists(&id) {
                    return Err(StoreError::Conflict(id));
                }
                let doc = Document::new(id, new.text);
                self.files.save(&doc)?;
                info!(doc_id = %doc.id, "Created document");
                Ok(slot.insert(doc).value().clone())
            }
        }
    }

    pub fn get_document(&self, id: &str) -> Result<Document> {
        Ok(self.hydrate(id)?.value().clone())
    }

    pub fn add_entity(&self, doc_id: &str, new: NewEntity) -> Result<Entity> {
        self.update(doc_id, |doc| {
            if !self.vocabulary.has_entity_type(&new.entity_type) {
                return Err(StoreError::Validation(format!(
                    "entity type '{}' is not in the vocabulary",
                    new.entity_type
                )));
            }

            let index = CharIndex::new(&doc.text);
            if new.start >= new.end || new.end > index.char_len() {
                return Err(StoreError::Validation(format!(
                    "span [{}, {}) is not within a text of {} characters",
                    new.start,
                    new.end,
                    index.char_len()
                )));
            }
            let actual = index.slice(new.start, new.end).unwrap_or_default();
            if actual != new.text {
                return Err(StoreError::Validation(format!(
                    "text '{}' does not match '{}' at [{}, {})",
                    new.text, actual, new.start, new.end
                )));
            }

            let entity = Entity {
                id: new_id(),
                start: new.start,
                end: new.end,
                text: new.text,
                entity_type: new.entity_type,
                code: new.code,
                annotator: Some(new.annotator.unwrap_or_else(|| self.defaults.annotator.clone())),
                timestamp: Utc::now(),
            };
            doc.entities.push(entity.clone());
            debug!(
                doc_id = %doc.id,
                entity_id = %entity.id,
                entity_type = %entity.entity_type,
                "Added entity"
            );
            Ok((entity, true))
        })
    }

    /// Remove an entity. Relations pointing at it are left untouched.
    pub fn delete_entity(&self, doc_id: &str, entity_id: &str) -> Result<usize> {
        self.update(doc_id, |doc| {
            let before = doc.entities.len();
            doc.entities.retain(|e| e.id != entity_id);
            let removed = before - doc.entities.len();
            if removed > 0 {
                debug!(doc_id = %doc.id, entity_id, "Deleted entity");
            }
            Ok((removed, removed > 0))
        })
    }

    pub fn add_relation(&self, doc_id: &str, new: NewRelation) -> Result<Relation> {
        self.update(doc_id, |doc| {
            if !self.vocabulary.has_relation_type(&new.relation_type) {
                return Err(StoreError::Validation(format!(
                    "relation type '{}' is not in the vocabulary",
                    new.relation_type
                )));
            }
            let direction = match new.direction.as_deref() {
                None => Direction::default(),
                Some(raw) => raw.parse::<Direction>().map_err(StoreError::Validation)?,
            };
            for endpoint in [&new.source_entity_id, &new.target_entity_id] {
                if !doc.has_entity(endpoint) {
                    return Err(StoreError::Validation(format!(
                        "entity '{}' does not exist in document '{}'",
                        endpoint, doc.id
                    )));
                }
            }

            let relation = Relation {
                id: new_id(),
                source_entity_id: new.source_entity_id,
                target_entity_id: new.target_entity_id,
                relation_type: new.relation_type,
                direction,
                annotator: Some(new.annotator.unwrap_or_else(|| self.defaults.annotator.clone())),
                timestamp: Utc::now(),
            };
            doc.relations.push(relation.clone());
            debug!(doc_id = %doc.id, relation_id = %relation.id, "Added relation");
            Ok((relation, true))
        })
    }

    pub fn delete_relation(&self, doc_id: &str, relation_id: &str) -> Result<usize> {
        self.update(doc_id, |doc| {
            let before = doc.relations.len();
            doc.relations.retain(|r| r.id != relation_id);
            let removed = before - doc.relations.len();
            if removed > 0 {
                debug!(doc_id = %doc.id, relation_id, "Deleted relation");
            }
            Ok((removed, removed > 0))
        })
    }

    /// Overwrite the workflow label; any string is accepted.
    pub fn set_status(&self, doc_id: &str, status: &str) -> Result<Document> {
        self.update(doc_id, |doc| {
            doc.status = status.to_string();
            debug!(doc_id = %doc.id, status, "Updated status");
            Ok((doc.clone(), true))
        })
    }

    pub fn export(&self, doc_id: &str) -> Result<serde_json::Value> {
        let doc = self.hydrate(doc_id)?;
        Ok(serde_json::to_value(doc.value())?)
    }

    /// Replace (or add) a document from its serialized form.
    pub fn import_document(&self, value: serde_json::Value) -> Result<Document> {
        let doc: Document = serde_json::from_value(value)
            .map_err(|e| StoreError::Validation(format!("malformed document: {}", e)))?;
        validate_structure(&doc)?;

        let doc = match self.docs.entry(doc.id.clone()) {
            MapEntry::Occupied(mut slot) => {
                self.files.save(&doc)?;
                slot.insert(doc.clone());
                doc
            }
            MapEntry::Vacant(slot) => {
                self.files.save(&doc)?;
                slot.insert(doc).value().clone()
            }
        };

        info!(
            doc_id = %doc.id,
            entities = doc.entities.len(),
            relations = doc.relations.len(),
            "Imported document"
        );
        Ok(doc)
    }

    /// Write every loaded document to disk. All documents are attempted; the
    /// first failure is returned.
    pub fn save_all(&self) -> Result<usize> {
        let mut saved = 0;
        let mut first_error = None;

        for doc in self.docs.iter() {
            match self.files.save(doc.value()) {
                Ok(()) => saved += 1,
                Err(err) => {
                    warn!(doc_id = %doc.key(), error = %err, "Failed to save document");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!(count = saved, "Saved all documents");
                Ok(saved)
            }
        }
    }

    pub fn stats(&self) -> StoreStats {
        self.docs.iter().fold(
            StoreStats {
                documents: 0,
                entities: 0,
                relations: 0,
            },
            |mut stats, doc| {
                stats.documents += 1;
                stats.entities += doc.entities.len();
                stats.relations += doc.relations.len();
                stats
            },
        )
    }

    /// Map entry for a document, loading it from disk if it is not in memory.
    fn hydrate(&self, id: &str) -> Result<RefMut<'_, String, Document>> {
        if let Some(doc) = self.docs.get_mut(id) {
            return Ok(doc);
        }
        if !is_valid_document_id(id) {
            return Err(StoreError::not_found(id));
        }

        let doc = self
            .files
            .load(id)?
            .ok_or_else(|| StoreError::not_found(id))?;
        debug!(doc_id = %id, "Hydrated document from disk");
        Ok(self.docs.entry(id.to_string()).or_insert(doc))
    }

    /// Apply `f` to a copy of the document. When it reports a change, the copy
    /// is saved and then swapped in, all while the entry is held.
    fn update<T>(
        &self,
        doc_id: &str,
        f: impl FnOnce(&mut Document) -> Result<(T, bool)>,
    ) -> Result<T> {
        let mut entry = self.hydrate(doc_id)?;
        let mut draft = entry.value().clone();
        let (out, changed) = f(&mut draft)?;
        if changed {
            self.files.save(&draft)?;
            *entry.value_mut() = draft;
        }
        Ok(out)
    }
}

/// Structural checks for imported documents: unique ids, spans inside the
/// text and matching it, relation endpoints among the document's entities.
fn validate_structure(doc: &Document) -> Result<()> {
    if !is_valid_document_id(&doc.id) {
        return Err(StoreError::Validation(format!(
            "document id '{}' must be 1-128 characters from [A-Za-z0-9._-]",
            doc.id
        )));
    }

    let index = CharIndex::new(&doc.text);
    let mut entity_ids = HashSet::new();
    for entity in &doc.entities {
        if entity.id.is_empty() || !entity_ids.insert(entity.id.as_str()) {
            return Err(StoreError::Validation(format!(
                "duplicate or empty entity id '{}'",
                entity.id
            )));
        }
        if entity.start >= entity.end
            || index.slice(entity.start, entity.end) != Some(entity.text.as_str())
        {
            return Err(StoreError::Validation(format!(
                "entity '{}' span [{}, {}) does not match its text",
                entity.id, entity.start, entity.end
            )));
        }
    }

    let mut relation_ids = HashSet::new();
    for relation in &doc.relations {
        if relation.id.is_empty() || !relation_ids.insert(relation.id.as_str()) {
            return Err(StoreError::Validation(format!(
                "duplicate or empty relation id '{}'",
                relation.id
            )));
        }
        for endpoint in [&relation.source_entity_id, &relation.target_entity_id] {
            if !entity_ids.contains(endpoint.as_str()) {
                return Err(StoreError::Validation(format!(
                    "relation '{}' references unknown entity '{}'",
                    relation.id, endpoint
                )));
            }
        }
    }

    Ok(())
}
