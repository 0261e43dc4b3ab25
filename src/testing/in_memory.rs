//! InMemoryService for exercising controllers without a network.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::transport::ResourceService;
use crate::{Error, ErrorKind, Record, Result};

type CreateFn<R> = dyn Fn(u64, &<R as Record>::Draft) -> R + Send + Sync;
type UpdateFn<R> = dyn Fn(&R, &<R as Record>::Patch) -> R + Send + Sync;

/// An in-memory [`ResourceService`] with failure injection.
///
/// Records live in a vector in insertion order. Since a generic service
/// cannot build a record from a draft, creation and updates go through
/// closures supplied with [`on_create`](InMemoryService::on_create) and
/// [`on_update`](InMemoryService::on_update); without them those calls fail
/// with `ErrorKind::Internal`.
///
/// ## Example
///
/// ```rust
/// use staffdesk::testing::InMemoryService;
/// use staffdesk::{ErrorKind, StockItem, StockStatus};
///
/// let service = InMemoryService::<StockItem>::new().with_records([StockItem {
///     id: 1,
///     name: "Pump".into(),
///     quantity: 4,
///     status: StockStatus::Available,
///     store: "Tunis".into(),
/// }]);
///
/// // Deleting id 1 will fail with a 404.
/// service.fail_id(1, ErrorKind::NotFound);
/// assert_eq!(service.len(), 1);
/// ```
///
/// ## Pausing
///
/// [`hold`](InMemoryService::hold) makes every call wait until
/// [`release`](InMemoryService::release), which lets a test observe a
/// pending operation or tear a controller down mid-flight.
pub struct InMemoryService<R: Record> {
    inner: Arc<Inner<R>>,
}

struct Inner<R: Record> {
    records: RwLock<Vec<R>>,
    failing_ids: RwLock<HashMap<R::Id, ErrorKind>>,
    fail_next: RwLock<Option<ErrorKind>>,
    create: RwLock<Option<Arc<CreateFn<R>>>>,
    update: RwLock<Option<Arc<UpdateFn<R>>>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
    gate: tokio::sync::watch::Sender<bool>,
}

impl<R: Record> Clone for InMemoryService<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Record> Default for InMemoryService<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> fmt::Debug for InMemoryService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryService")
            .field("endpoint", &R::ENDPOINT)
            .field("records", &self.len())
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}

impl<R: Record> InMemoryService<R> {
    /// Creates an empty service.
    pub fn new() -> Self {
        let (gate, _) = tokio::sync::watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(Vec::new()),
                failing_ids: RwLock::new(HashMap::new()),
                fail_next: RwLock::new(None),
                create: RwLock::new(None),
                update: RwLock::new(None),
                next_id: AtomicU64::new(1),
                requests: AtomicUsize::new(0),
                gate,
            }),
        }
    }

    /// Seeds the store.
    #[must_use]
    pub fn with_records(self, records: impl IntoIterator<Item = R>) -> Self {
        self.inner.records.write().extend(records);
        self
    }

    /// Sets how a draft becomes a record. The closure receives a sequence
    /// number starting at 1000 for use as the new identifier.
    #[must_use]
    pub fn on_create(self, create: impl Fn(u64, &R::Draft) -> R + Send + Sync + 'static) -> Self {
        self.inner.next_id.store(1000, Ordering::SeqCst);
        *self.inner.create.write() = Some(Arc::new(create));
        self
    }

    /// Sets how a patch is applied to a stored record.
    #[must_use]
    pub fn on_update(self, update: impl Fn(&R, &R::Patch) -> R + Send + Sync + 'static) -> Self {
        *self.inner.update.write() = Some(Arc::new(update));
        self
    }

    /// Makes every update and delete of `id` fail with `kind`.
    pub fn fail_id(&self, id: R::Id, kind: ErrorKind) {
        self.inner.failing_ids.write().insert(id, kind);
    }

    /// Makes the next call, whatever it is, fail with `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        *self.inner.fail_next.write() = Some(kind);
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.inner.failing_ids.write().clear();
        *self.inner.fail_next.write() = None;
    }

    /// Makes calls wait until [`release`](InMemoryService::release).
    pub fn hold(&self) {
        self.inner.gate.send_replace(false);
    }

    /// Lets held and future calls proceed.
    pub fn release(&self) {
        self.inner.gate.send_replace(true);
    }

    /// Number of calls received, including failed ones.
    pub fn request_count(&self) -> usize {
        self.inner.requests.load(Ordering::SeqCst)
    }

    /// Copy of the stored records.
    pub fn records(&self) -> Vec<R> {
        self.inner.records.read().clone()
    }

    /// Replaces the stored records without going through the service API.
    pub fn replace_records(&self, records: impl IntoIterator<Item = R>) {
        *self.inner.records.write() = records.into_iter().collect();
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.records.read().is_empty()
    }

    /// Counts the call, waits for the gate, and applies one-shot failures.
    async fn enter(&self, id: Option<&R::Id>) -> Result<()> {
        self.inner.requests.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.inner.gate.subscribe();
        if gate.wait_for(|open| *open).await.is_err() {
            return Err(Error::cancelled());
        }

        if let Some(kind) = self.inner.fail_next.write().take() {
            return Err(injected(kind));
        }
        if let Some(kind) = id.and_then(|id| self.inner.failing_ids.read().get(id).copied()) {
            return Err(injected(kind));
        }
        Ok(())
    }
}

fn injected(kind: ErrorKind) -> Error {
    Error::new(kind, "injected failure").with_status(kind.http_status_code())
}

#[async_trait::async_trait]
impl<R: Record> ResourceService<R> for InMemoryService<R> {
    async fn list(&self) -> Result<Vec<R>> {
        self.enter(None).await?;
        Ok(self.records())
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.enter(None).await?;
        let create = self
            .inner
            .create
            .read()
            .clone()
            .ok_or_else(|| Error::internal("InMemoryService has no create handler"))?;
        let seq = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let record = create(seq, draft);
        self.inner.records.write().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &R::Id, patch: &R::Patch) -> Result<R> {
        self.enter(Some(id)).await?;
        let update = self
            .inner
            .update
            .read()
            .clone()
            .ok_or_else(|| Error::internal("InMemoryService has no update handler"))?;

        let mut records = self.inner.records.write();
        let slot = records
            .iter_mut()
            .find(|record| record.id() == *id)
            .ok_or_else(|| Error::from_status(404, Some("Not found.")))?;
        *slot = update(slot, patch);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &R::Id) -> Result<()> {
        self.enter(Some(id)).await?;
        let mut records = self.inner.records.write();
        let before = records.len();
        records.retain(|record| record.id() != *id);
        if records.len() == before {
            return Err(Error::from_status(404, Some("Not found.")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewStockItem, StockItem, StockItemPatch, StockStatus};

    fn item(id: i64, name: &str) -> StockItem {
        StockItem {
            id,
            name: name.to_string(),
            quantity: 1,
            status: StockStatus::Available,
            store: "Tunis".to_string(),
        }
    }

    fn service() -> InMemoryService<StockItem> {
        InMemoryService::new()
            .with_records([item(1, "Pump"), item(2, "Valve")])
            .on_create(|seq, draft: &NewStockItem| StockItem {
                id: seq as i64,
                name: draft.name.clone(),
                quantity: draft.quantity,
                status: draft.status,
                store: draft.store.clone(),
            })
            .on_update(|record, patch: &StockItemPatch| StockItem {
                quantity: patch.quantity.unwrap_or(record.quantity),
                ..record.clone()
            })
    }

    #[tokio::test]
    async fn test_crud_round() {
        let service = service();
        let created = service
            .create(&NewStockItem {
                name: "Meter".into(),
                quantity: 2,
                status: StockStatus::Available,
                store: "Sfax".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1000);

        let patch = StockItemPatch {
            quantity: Some(9),
            ..Default::default()
        };
        assert_eq!(service.update(&1, &patch).await.unwrap().quantity, 9);

        service.delete(&2).await.unwrap();
        let ids: Vec<i64> = service.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 1000]);
        assert_eq!(service.request_count(), 4);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let err = service().delete(&42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let service = service();
        service.fail_id(1, ErrorKind::Conflict);
        assert_eq!(service.delete(&1).await.unwrap_err().kind(), ErrorKind::Conflict);
        assert!(service.delete(&2).await.is_ok());

        service.fail_next(ErrorKind::Unavailable);
        assert_eq!(service.list().await.unwrap_err().kind(), ErrorKind::Unavailable);
        assert!(service.list().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_without_handler_fails() {
        let service = InMemoryService::<StockItem>::new();
        let draft = NewStockItem {
            name: "x".into(),
            quantity: 1,
            status: StockStatus::Available,
            store: "y".into(),
        };
        assert_eq!(service.create(&draft).await.unwrap_err().kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_hold_and_release() {
        let service = service();
        service.hold();

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.list().await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        service.release();
        assert_eq!(pending.await.unwrap().unwrap().len(), 2);
    }
}
