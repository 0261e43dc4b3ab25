//! The data service contract a controller talks to.

use std::sync::Arc;

use crate::{Record, Result};

/// Remote CRUD operations for one resource.
///
/// The controller never calls the network directly; it goes through this
/// trait, so the same controller runs against
/// [`RestService`](crate::RestService) in production and
/// [`InMemoryService`](crate::testing::InMemoryService) in tests.
///
/// Every call either succeeds with the server's view of the record or fails
/// with an [`Error`](crate::Error) carrying a kind and message. Implementations
/// never mutate controller state.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn ResourceService<R>>`.
#[async_trait::async_trait]
pub trait ResourceService<R: Record>: Send + Sync {
    /// Fetches the whole collection.
    async fn list(&self) -> Result<Vec<R>>;

    /// Creates a record and returns it with its assigned identifier.
    async fn create(&self, draft: &R::Draft) -> Result<R>;

    /// Applies a partial update and returns the updated record.
    async fn update(&self, id: &R::Id, patch: &R::Patch) -> Result<R>;

    /// Deletes a record.
    async fn delete(&self, id: &R::Id) -> Result<()>;
}

#[async_trait::async_trait]
impl<R: Record, S: ResourceService<R> + ?Sized> ResourceService<R> for Arc<S> {
    async fn list(&self) -> Result<Vec<R>> {
        (**self).list().await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &R::Id, patch: &R::Patch) -> Result<R> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &R::Id) -> Result<()> {
        (**self).delete(id).await
    }
}
