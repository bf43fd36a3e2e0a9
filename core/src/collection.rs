//! In-process document collection.
//!
//! # Design
//! `Collection` is the shared handle every request works through. Clones are
//! cheap and all of them see the same documents. Each operation takes the
//! lock once, so single-document reads and writes are atomic; nothing spans
//! more than one document. Identifiers are minted on insert and never reused.
//!
//! The method names and result shapes follow the usual document-store client
//! conventions (`insert_one` reports acknowledgement, the `find_one_and_*`
//! family returns the affected document) so a networked backend can slot in
//! behind `TodoStore` without reshaping the store layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::id::ObjectId;

/// Whether writes report acknowledgement back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteConcern {
    #[default]
    Acknowledged,
    /// Writes are applied but `acknowledged` is always `false`.
    Unacknowledged,
}

/// Which version of a document `find_one_and_update` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDocument {
    Before,
    After,
}

/// A stored document and its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<T> {
    pub id: ObjectId,
    pub body: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: ObjectId,
}

/// A named set of documents keyed by `ObjectId`, iterated in id order.
#[derive(Debug)]
pub struct Collection<T> {
    name: Arc<str>,
    write_concern: WriteConcern,
    documents: Arc<RwLock<BTreeMap<ObjectId, T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            write_concern: self.write_concern,
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<T: Clone> Collection<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            write_concern: WriteConcern::default(),
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_write_concern(mut self, write_concern: WriteConcern) -> Self {
        self.write_concern = write_concern;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn insert_one(&self, body: T) -> InsertOneResult {
        let mut documents = self.documents.write().await;
        let id = ObjectId::new();
        documents.insert(id, body);
        InsertOneResult {
            acknowledged: self.write_concern == WriteConcern::Acknowledged,
            inserted_id: id,
        }
    }

    /// Every document whose body satisfies `filter`.
    pub async fn find<F>(&self, filter: F) -> Vec<Document<T>>
    where
        F: Fn(&T) -> bool,
    {
        self.documents
            .read()
            .await
            .iter()
            .filter(|(_, body)| filter(body))
            .map(|(id, body)| Document {
                id: *id,
                body: body.clone(),
            })
            .collect()
    }

    pub async fn find_one(&self, id: &ObjectId) -> Option<Document<T>> {
        self.documents.read().await.get(id).map(|body| Document {
            id: *id,
            body: body.clone(),
        })
    }

    pub async fn find_one_and_update<F>(
        &self,
        id: &ObjectId,
        update: F,
        returning: ReturnDocument,
    ) -> Option<Document<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut documents = self.documents.write().await;
        let body = documents.get_mut(id)?;
        let before = match returning {
            ReturnDocument::Before => Some(body.clone()),
            ReturnDocument::After => None,
        };
        update(&mut *body);
        Some(Document {
            id: *id,
            body: before.unwrap_or_else(|| body.clone()),
        })
    }

    pub async fn find_one_and_delete(&self, id: &ObjectId) -> Option<Document<T>> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|body| Document { id: *id, body })
    }
}
