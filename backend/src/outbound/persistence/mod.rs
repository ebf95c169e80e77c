//! Persistence adapters: the document-collection contract and the user store
//! built on it.

pub mod document_store;
pub mod document_user_store;

pub use document_store::{
    Document, DocumentStore, DocumentStoreError, Filter, InMemoryDocumentStore, Update,
};
pub use document_user_store::{DocumentUserStore, UNIQUE_USER_FIELDS};
