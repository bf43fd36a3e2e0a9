//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything below the HTTP layer: the todo schema and its validation
//! rules, collection-assigned identifiers, an in-process document collection,
//! and the `TodoStore` abstraction handlers persist through.
//!
//! # Design
//! - `Todo` and `TodoPatch` can only be built by validating input, so store
//!   writes cannot receive unchecked data.
//! - The collection handle is passed into `CollectionStore::new` rather than
//!   living in a global, so tests can swap in their own store.
//! - Store results are explicit: not-found is `Ok(None)` / `Ok(false)`.
//! - No HTTP types appear here; the server crate owns status codes.

pub mod collection;
pub mod error;
pub mod id;
pub mod schema;
pub mod store;

pub use collection::{Collection, Document, InsertOneResult, ReturnDocument, WriteConcern};
pub use error::{FieldError, MalformedId, StoreError, ValidationError};
pub use id::ObjectId;
pub use schema::{Todo, TodoPatch, TodoWithId};
pub use store::{CollectionStore, ListFilter, TodoStore};
