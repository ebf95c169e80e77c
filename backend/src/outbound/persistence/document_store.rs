//! Generic document-collection contract and its in-memory implementation.
//!
//! The service consumes the store through this trait only; which driver
//! backs it is a deployment concern. Operations are atomic at the
//! single-document level and there are no multi-document transactions.
//! Friend-set mutations rely on the [`Update::AddToSet`]/[`Update::Pull`]
//! primitives rather than replacing whole documents, which closes the
//! lost-update race between concurrent mutations of the same record.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Field the store mints identifiers under.
pub const ID_FIELD: &str = "id";

/// Errors raised by document store implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentStoreError {
    /// The store could not be reached.
    #[error("document store connection failed: {message}")]
    Connection {
        /// Driver-supplied description.
        message: String,
    },
    /// An operation failed during execution.
    #[error("document store operation failed: {message}")]
    Operation {
        /// Driver-supplied description.
        message: String,
    },
    /// A unique key was violated at insertion or merge time.
    #[error("unique key violated on field {field}")]
    DuplicateKey {
        /// The unique field that collided.
        field: String,
    },
}

impl DocumentStoreError {
    /// Operation failure with a driver message.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }

    /// Unique key violation on the named field.
    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
}

/// Conjunction of equality/inequality clauses over document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Filter on one field equalling a value.
    #[must_use]
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_eq(field, value)
    }

    /// Add an equality clause.
    #[must_use]
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Add an inequality clause. A document missing the field counts as
    /// not-equal.
    #[must_use]
    pub fn and_ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Ne {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Whether a document satisfies every clause.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq { field, value } => document.get(field) == Some(value),
            Clause::Ne { field, value } => document.get(field) != Some(value),
        })
    }
}

/// Mutation applied by [`DocumentStore::update_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Merge the given fields into the document; absent fields are
    /// untouched.
    Merge(Document),
    /// Append a value to an array field unless already present.
    AddToSet {
        /// Array field to mutate.
        field: String,
        /// Value to add.
        value: Value,
    },
    /// Remove every occurrence of a value from an array field.
    Pull {
        /// Array field to mutate.
        field: String,
        /// Value to remove.
        value: Value,
    },
}

/// Collection-level CRUD contract the user store adapter builds on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, minting an [`ID_FIELD`] identifier when absent,
    /// and return the stored document.
    async fn insert(&self, document: Document) -> Result<Document, DocumentStoreError>;

    /// Return the first matching document.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, DocumentStoreError>;

    /// Return matching documents in stable insertion order, bounded by
    /// limit/offset.
    async fn find(
        &self,
        filter: &Filter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Apply an update to the first matching document and return the
    /// post-update document, or `None` when nothing matched.
    async fn update_one(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Delete the first matching document. `true` iff one was removed.
    async fn delete_one(&self, filter: &Filter) -> Result<bool, DocumentStoreError>;
}

/// In-memory document collection.
///
/// Stands in for a real driver at the composition root and in tests until a
/// persistence adapter is wired. Documents keep insertion order, so listings
/// are stable across repeated calls absent mutation. Every operation takes
/// the collection lock once, which makes each individual operation atomic.
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
    unique_fields: Vec<String>,
}

impl InMemoryDocumentStore {
    /// Empty collection without unique keys.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            unique_fields: Vec::new(),
        }
    }

    /// Empty collection enforcing uniqueness on the given fields at insert
    /// and merge time.
    #[must_use]
    pub fn with_unique_fields(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            unique_fields: fields.into_iter().map(str::to_owned).collect(),
        }
    }

    fn unique_violation(
        &self,
        documents: &[Document],
        candidate: &Document,
        skip: Option<usize>,
    ) -> Option<String> {
        self.unique_fields.iter().find_map(|field| {
            let value = candidate.get(field)?;
            let collides = documents
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip)
                .any(|(_, existing)| existing.get(field) == Some(value));
            collides.then(|| field.clone())
        })
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_update(document: &mut Document, update: &Update) -> Result<(), DocumentStoreError> {
    match update {
        Update::Merge(fields) => {
            for (key, value) in fields {
                document.insert(key.clone(), value.clone());
            }
            Ok(())
        }
        Update::AddToSet { field, value } => match document
            .entry(field.clone())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => {
                if !items.contains(value) {
                    items.push(value.clone());
                }
                Ok(())
            }
            _ => Err(DocumentStoreError::operation(format!(
                "field {field} is not an array"
            ))),
        },
        Update::Pull { field, value } => match document.get_mut(field) {
            None => Ok(()),
            Some(Value::Array(items)) => {
                items.retain(|item| item != value);
                Ok(())
            }
            Some(_) => Err(DocumentStoreError::operation(format!(
                "field {field} is not an array"
            ))),
        },
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, document: Document) -> Result<Document, DocumentStoreError> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(field) = self.unique_violation(&documents, &document, None) {
            return Err(DocumentStoreError::duplicate_key(field));
        }

        let mut stored = document;
        stored
            .entry(ID_FIELD.to_owned())
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        documents.push(stored.clone());
        Ok(stored)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, DocumentStoreError> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.iter().find(|doc| filter.matches(doc)).cloned())
    }

    async fn find(
        &self,
        filter: &Filter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(position) = documents.iter().position(|doc| filter.matches(doc)) else {
            return Ok(None);
        };

        let mut updated = documents
            .get(position)
            .cloned()
            .unwrap_or_default();
        apply_update(&mut updated, update)?;

        if let Some(field) = self.unique_violation(&documents, &updated, Some(position)) {
            return Err(DocumentStoreError::duplicate_key(field));
        }

        if let Some(slot) = documents.get_mut(position) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<bool, DocumentStoreError> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match documents.iter().position(|doc| filter.matches(doc)) {
            Some(position) => {
                documents.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
