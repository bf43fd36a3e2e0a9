//! The todo store: identity-based persistence over a document collection.
//!
//! # Design
//! `TodoStore` is the seam handlers depend on. Every operation maps to a
//! single collection call, and "nothing there" is an ordinary value
//! (`Ok(None)`, `Ok(false)`) rather than an error, so callers match on
//! outcomes explicitly. Writes only accept `Todo` and `TodoPatch`, both of
//! which exist solely as validated values.

use std::future::Future;

use crate::collection::{Collection, Document, ReturnDocument};
use crate::error::StoreError;
use crate::id::ObjectId;
use crate::schema::{Todo, TodoPatch, TodoWithId};

/// Persistence operations over the todo collection.
pub trait TodoStore: Clone + Send + Sync + 'static {
    /// All todos matching `filter`, in collection order.
    fn list(
        &self,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<Vec<TodoWithId>, StoreError>> + Send;

    /// Insert `todo` and return it with its new identifier.
    fn create(&self, todo: Todo) -> impl Future<Output = Result<TodoWithId, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: &ObjectId,
    ) -> impl Future<Output = Result<Option<TodoWithId>, StoreError>> + Send;

    /// Merge `patch` into the stored todo and return the updated document.
    fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<Option<TodoWithId>, StoreError>> + Send;

    /// Returns whether a document was removed.
    fn delete_by_id(&self, id: &ObjectId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Predicate for `TodoStore::list`. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    status: Option<bool>,
    /// Stored lowercased.
    search: Option<String>,
}

impl ListFilter {
    /// Build a filter from raw query values.
    ///
    /// `status` only applies when it is exactly `"true"` or `"false"`; any
    /// other value is ignored. An empty `search` is ignored as well.
    pub fn from_query(status: Option<&str>, search: Option<&str>) -> Self {
        let status = match status {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        let search = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        Self { status, search }
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_lowercase());
        self
    }

    pub fn status(&self) -> Option<bool> {
        self.status
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        if self.status.is_some_and(|status| todo.status() != status) {
            return false;
        }
        match &self.search {
            Some(term) => {
                todo.title().to_lowercase().contains(term.as_str())
                    || todo.description().to_lowercase().contains(term.as_str())
            }
            None => true,
        }
    }
}

/// `TodoStore` backed by a `Collection<Todo>`.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    todos: Collection<Todo>,
}

impl CollectionStore {
    pub const COLLECTION: &'static str = "todos";

    pub fn new(todos: Collection<Todo>) -> Self {
        Self { todos }
    }

    /// A store over a fresh, empty `todos` collection.
    pub fn in_memory() -> Self {
        Self::new(Collection::new(Self::COLLECTION))
    }

    pub fn collection(&self) -> &Collection<Todo> {
        &self.todos
    }
}

impl TodoStore for CollectionStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<TodoWithId>, StoreError> {
        let found = self.todos.find(|todo| filter.matches(todo)).await;
        Ok(found.into_iter().map(TodoWithId::from).collect())
    }

    async fn create(&self, todo: Todo) -> Result<TodoWithId, StoreError> {
        let result = self.todos.insert_one(todo.clone()).await;
        if !result.acknowledged {
            return Err(StoreError::NotAcknowledged(self.todos.name().to_string()));
        }
        Ok(TodoWithId {
            id: result.inserted_id,
            todo,
        })
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<TodoWithId>, StoreError> {
        Ok(self.todos.find_one(id).await.map(TodoWithId::from))
    }

    async fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &TodoPatch,
    ) -> Result<Option<TodoWithId>, StoreError> {
        let updated = self
            .todos
            .find_one_and_update(id, |todo| patch.apply(todo), ReturnDocument::After)
            .await;
        Ok(updated.map(TodoWithId::from))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.todos.find_one_and_delete(id).await.is_some())
    }
}

impl From<Document<Todo>> for TodoWithId {
    fn from(document: Document<Todo>) -> Self {
        Self {
            id: document.id,
            todo: document.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str, description: &str, status: bool) -> Todo {
        Todo::new(title, description, "2024-01-01", status).unwrap()
    }

    #[test]
    fn status_applies_only_to_exact_booleans() {
        assert_eq!(ListFilter::from_query(Some("true"), None).status(), Some(true));
        assert_eq!(ListFilter::from_query(Some("false"), None).status(), Some(false));
        for ignored in ["maybe", "TRUE", "1", "", " true"] {
            assert_eq!(ListFilter::from_query(Some(ignored), None).status(), None, "{ignored}");
        }
    }

    #[test]
    fn empty_search_is_ignored() {
        assert_eq!(ListFilter::from_query(None, Some("")), ListFilter::default());
    }

    #[test]
    fn search_is_case_insensitive_over_title_or_description() {
        let filter = ListFilter::default().with_search("MiLk");
        assert!(filter.matches(&todo("Buy milk", "2%", false)));
        assert!(filter.matches(&todo("Groceries", "oat MILK", false)));
        assert!(!filter.matches(&todo("Groceries", "bread", false)));
    }

    #[test]
    fn search_terms_are_literal() {
        let filter = ListFilter::default().with_search("a.c");
        assert!(!filter.matches(&todo("abc", "abc", false)));
        assert!(filter.matches(&todo("xa.cx", "-", false)));
    }

    #[test]
    fn status_and_search_combine() {
        let filter = ListFilter::default().with_status(true).with_search("milk");
        assert!(filter.matches(&todo("Buy milk", "2%", true)));
        assert!(!filter.matches(&todo("Buy milk", "2%", false)));
        assert!(!filter.matches(&todo("Walk dog", "park", true)));
    }

    #[tokio::test]
    async fn create_fails_when_insert_is_not_acknowledged() {
        use crate::collection::WriteConcern;

        let store = CollectionStore::new(
            Collection::new(CollectionStore::COLLECTION)
                .with_write_concern(WriteConcern::Unacknowledged),
        );
        let err = store.create(todo("a", "b", false)).await.unwrap_err();
        assert_eq!(err, StoreError::NotAcknowledged("todos".into()));
    }
}
