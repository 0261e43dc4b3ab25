//! The tabular resource controller.
//!
//! One [`ResourceController`] owns one resource's collection and view state:
//!
//! ```text
//! collection ─► search ─► filters (AND) ─► stable sort ─► page ─► VisibleSlice
//! ```
//!
//! Reads (`refresh`, the visible slice, export) are always allowed. Mutations
//! (`create`, `update`, `remove`, `bulk_remove`) pass the
//! [`PermissionGate`] first, then call the data service, and touch the
//! collection only after the service confirms. At most one service call is in
//! flight per controller; a second one fails with `ErrorKind::Busy`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffdesk::prelude::*;
//!
//! let stock = client.stock_items(Role::Privileged);
//! stock.refresh().await?;
//!
//! stock.set_search("pump");
//! stock.set_sort(StockSortKey::Quantity);
//! stock.select_all();
//!
//! match stock.remove_selected().await? {
//!     BulkOutcome::Success { removed } => println!("removed {}", removed.len()),
//!     BulkOutcome::PartialFailure { failed, .. } => println!("{} failed", failed.len()),
//! }
//! ```

mod pending;
mod selection;
mod view;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use tracing::instrument;

pub use pending::{BulkOutcome, OperationKind, PendingOperation};
use selection::Selection;
pub use view::{SortState, VisibleSlice, clamp_page, filter_records, sort_records, total_pages};
use view::ViewState;

use crate::auth::{PermissionGate, Role};
use crate::config::ControllerConfig;
use crate::export::{ExportEncoder, ExportSheet};
use crate::transport::ResourceService;
use crate::types::Record;
use crate::{Error, MutationError, Result};

/// Read model handed to presentation.
#[derive(Debug, Clone)]
pub struct ControllerSnapshot<R: Record> {
    /// Records on the current page.
    pub records: Vec<R>,
    /// Current page, within `1..=total_pages`.
    pub current_page: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Records passing search and filters, across all pages.
    pub total_matches: usize,
    /// Selected identifiers, possibly on other pages.
    pub selection: BTreeSet<R::Id>,
    /// Whether every filtered record is selected (header checkbox).
    pub all_selected: bool,
    /// The in-flight operation, if any.
    pub pending: Option<PendingOperation<R::Id>>,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Active search term.
    pub search_term: String,
    /// Active sort.
    pub sort: SortState<R::SortKey>,
    /// Actor role the controller gates mutations on.
    pub role: Role,
}

struct State<R: Record> {
    records: Vec<R>,
    view: ViewState<R>,
    selection: Selection<R::Id>,
    pending: Option<PendingOperation<R::Id>>,
    last_error: Option<String>,
    role: Role,
    shut_down: bool,
}

impl<R: Record> State<R> {
    /// Restores the invariants after the collection or filters change.
    fn settle(&mut self) {
        let present: HashSet<R::Id> = self.records.iter().map(Record::id).collect();
        self.selection.retain(|id| present.contains(id));
        self.view.clamp_page(&self.records);
    }

    fn matching_ids(&self) -> Vec<R::Id> {
        self.view
            .matching(&self.records)
            .into_iter()
            .map(Record::id)
            .collect()
    }

    fn all_selected(&self) -> bool {
        let ids = self.matching_ids();
        !ids.is_empty() && ids.iter().all(|id| self.selection.contains(id))
    }

    fn contains(&self, id: &R::Id) -> bool {
        self.records.iter().any(|record| record.id() == *id)
    }
}

struct Inner<R: Record> {
    service: Arc<dyn ResourceService<R>>,
    state: RwLock<State<R>>,
}

/// Clears the pending slot when the command that set it finishes, however
/// it finishes.
struct PendingGuard<'a, R: Record> {
    state: &'a RwLock<State<R>>,
}

impl<R: Record> Drop for PendingGuard<'_, R> {
    fn drop(&mut self) {
        self.state.write().pending = None;
    }
}

/// Client-resident controller for one resource type.
///
/// Cheap to clone; clones share state. See the [module docs](self).
pub struct ResourceController<R: Record> {
    inner: Arc<Inner<R>>,
}

impl<R: Record> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Record> fmt::Debug for ResourceController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("ResourceController")
            .field("resource", &R::RESOURCE)
            .field("records", &state.records.len())
            .field("role", &state.role)
            .field("view", &state.view)
            .field("pending", &state.pending)
            .field("shut_down", &state.shut_down)
            .finish()
    }
}

impl<R: Record> ResourceController<R> {
    /// Creates a controller with an empty collection.
    pub fn new(
        service: impl ResourceService<R> + 'static,
        role: Role,
        config: ControllerConfig,
    ) -> Self {
        Self::from_service(Arc::new(service), role, config)
    }

    /// Creates a controller over a shared service.
    pub fn from_service(
        service: Arc<dyn ResourceService<R>>,
        role: Role,
        config: ControllerConfig,
    ) -> Self {
        let state = State {
            records: Vec::new(),
            view: ViewState::new(config.page_size(), config.default_order()),
            selection: Selection::default(),
            pending: None,
            last_error: None,
            role,
            shut_down: false,
        };
        Self {
            inner: Arc::new(Inner {
                service,
                state: RwLock::new(state),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Service commands
    // ------------------------------------------------------------------

    /// Replaces the collection with the service's list.
    ///
    /// On failure the previous collection stays visible and `last_error` is
    /// set. Returns the number of records fetched.
    #[instrument(skip_all, fields(resource = R::RESOURCE, operation = "refresh"))]
    pub async fn refresh(&self) -> Result<usize> {
        let _pending = self.begin(OperationKind::Refresh, Vec::new())?;

        match self.inner.service.list().await {
            Ok(records) => self.apply(|state| {
                let count = records.len();
                state.records = records;
                state.settle();
                tracing::debug!(count, "collection refreshed");
                count
            }),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Creates a record and inserts it at the front of the collection.
    #[instrument(skip_all, fields(resource = R::RESOURCE, operation = "create"))]
    pub async fn create(&self, draft: R::Draft) -> std::result::Result<R, MutationError> {
        self.authorize(OperationKind::Create)?;
        if let Err(err) = R::validate_draft(&draft) {
            return Err(self.fail(err).into());
        }
        let _pending = self.begin(OperationKind::Create, Vec::new())?;

        match self.inner.service.create(&draft).await {
            Ok(record) => Ok(self.apply(|state| {
                let id = record.id();
                state.records.retain(|existing| existing.id() != id);
                state.records.insert(0, record.clone());
                state.settle();
                tracing::debug!(%id, "record created");
                record
            })?),
            Err(err) => Err(self.fail(err).into()),
        }
    }

    /// Applies a partial update and replaces the record in place.
    ///
    /// If the record left the collection while the call was in flight, the
    /// collection is not touched.
    #[instrument(skip_all, fields(resource = R::RESOURCE, operation = "update", id = %id))]
    pub async fn update(
        &self,
        id: R::Id,
        patch: R::Patch,
    ) -> std::result::Result<R, MutationError> {
        self.authorize(OperationKind::Update)?;
        let _pending = self.begin(OperationKind::Update, vec![id.clone()])?;

        match self.inner.service.update(&id, &patch).await {
            Ok(record) => Ok(self.apply(|state| {
                if let Some(slot) = state.records.iter_mut().find(|r| r.id() == id) {
                    *slot = record.clone();
                }
                state.settle();
                tracing::debug!("record updated");
                record
            })?),
            Err(err) => Err(self.fail(err).into()),
        }
    }

    /// Deletes a record and drops it from the collection and the selection.
    #[instrument(skip_all, fields(resource = R::RESOURCE, operation = "remove", id = %id))]
    pub async fn remove(&self, id: R::Id) -> std::result::Result<(), MutationError> {
        self.authorize(OperationKind::Remove)?;
        let _pending = self.begin(OperationKind::Remove, vec![id.clone()])?;

        match self.inner.service.delete(&id).await {
            Ok(()) => Ok(self.apply(|state| {
                state.records.retain(|r| r.id() != id);
                state.selection.remove(&id);
                state.settle();
                tracing::debug!("record removed");
            })?),
            Err(err) => Err(self.fail(err).into()),
        }
    }

    /// Deletes several records with concurrent requests.
    ///
    /// Succeeded identifiers leave the collection; failed ones stay and are
    /// reported in [`BulkOutcome::PartialFailure`]. Duplicate identifiers are
    /// deleted once.
    #[instrument(skip_all, fields(resource = R::RESOURCE, operation = "bulk remove"))]
    pub async fn bulk_remove(
        &self,
        ids: impl IntoIterator<Item = R::Id>,
    ) -> std::result::Result<BulkOutcome<R::Id>, MutationError> {
        self.authorize(OperationKind::BulkRemove)?;

        let mut seen = HashSet::new();
        let ids: Vec<R::Id> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        if ids.is_empty() {
            return Ok(BulkOutcome::Success {
                removed: Vec::new(),
            });
        }

        let _pending = self.begin(OperationKind::BulkRemove, ids.clone())?;

        let service = &self.inner.service;
        let results = join_all(ids.into_iter().map(|id| async move {
            let result = service.delete(&id).await;
            (id, result)
        }))
        .await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => succeeded.push(id),
                Err(err) => failed.push((id, err)),
            }
        }

        let outcome = self.apply(|state| {
            let removed: HashSet<&R::Id> = succeeded.iter().collect();
            state.records.retain(|r| !removed.contains(&r.id()));
            state.settle();

            if failed.is_empty() {
                tracing::debug!(count = succeeded.len(), "bulk remove succeeded");
                return BulkOutcome::Success { removed: succeeded };
            }

            let message = format!(
                "failed to remove {} of {} {}: {}",
                failed.len(),
                succeeded.len() + failed.len(),
                R::RESOURCE,
                failed
                    .iter()
                    .map(|(id, err)| format!("{id} ({})", err.message()))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            tracing::warn!(
                succeeded = succeeded.len(),
                failed = failed.len(),
                "bulk remove partially failed"
            );
            state.last_error = Some(message);
            BulkOutcome::PartialFailure { succeeded, failed }
        })?;

        Ok(outcome)
    }

    /// [`bulk_remove`](Self::bulk_remove) over the current selection.
    pub async fn remove_selected(&self) -> std::result::Result<BulkOutcome<R::Id>, MutationError> {
        let ids = self.inner.state.read().selection.to_vec();
        self.bulk_remove(ids).await
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flips selection of `id`. Identifiers not in the collection are ignored.
    ///
    /// Returns `true` if `id` is now selected.
    pub fn toggle(&self, id: R::Id) -> bool {
        let mut state = self.inner.state.write();
        if !state.contains(&id) {
            return false;
        }
        state.selection.toggle(id)
    }

    /// Selects every record passing search and filters, on every page.
    pub fn select_all(&self) {
        let mut state = self.inner.state.write();
        let ids = state.matching_ids();
        state.selection.replace(ids);
    }

    /// Empties the selection.
    pub fn clear_selection(&self) {
        self.inner.state.write().selection.clear();
    }

    /// Header checkbox: `true` selects all filtered records, `false` clears.
    pub fn set_all_selected(&self, selected: bool) {
        if selected {
            self.select_all();
        } else {
            self.clear_selection();
        }
    }

    /// Flips the header checkbox.
    pub fn toggle_all(&self) {
        self.set_all_selected(!self.all_selected());
    }

    /// Whether the filtered set is non-empty and entirely selected.
    pub fn all_selected(&self) -> bool {
        self.inner.state.read().all_selected()
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &R::Id) -> bool {
        self.inner.state.read().selection.contains(id)
    }

    /// Selected identifiers.
    pub fn selection(&self) -> BTreeSet<R::Id> {
        self.inner.state.read().selection.to_set()
    }

    // ------------------------------------------------------------------
    // Search, filters, sort, paging
    // ------------------------------------------------------------------

    /// Selects the sort key: the active key toggles direction, a new key
    /// starts ascending. The current page is kept.
    pub fn set_sort(&self, key: R::SortKey) {
        let mut state = self.inner.state.write();
        state.view.sort.select(key);
        let State { records, view, .. } = &mut *state;
        view.clamp_page(records);
    }

    /// Active sort.
    pub fn sort(&self) -> SortState<R::SortKey> {
        self.inner.state.read().view.sort
    }

    /// Accepts only records whose `key` equals `value`, and returns to page 1.
    ///
    /// An empty `value` removes the filter.
    pub fn set_filter(&self, key: R::FilterKey, value: impl Into<String>) {
        let value = value.into();
        self.update_view(|view| {
            if value.is_empty() {
                view.filters.remove(&key);
            } else {
                view.filters.insert(key, value);
            }
            view.current_page = 1;
        });
    }

    /// Removes the filter on `key`, and returns to page 1.
    pub fn clear_filter(&self, key: R::FilterKey) {
        self.update_view(|view| {
            view.filters.remove(&key);
            view.current_page = 1;
        });
    }

    /// Removes every filter, and returns to page 1.
    pub fn clear_filters(&self) {
        self.update_view(|view| {
            view.filters.clear();
            view.current_page = 1;
        });
    }

    /// Accepted value for `key`, if filtered.
    pub fn filter(&self, key: R::FilterKey) -> Option<String> {
        self.inner.state.read().view.filters.get(&key).cloned()
    }

    /// Sets the search term, and returns to page 1.
    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        self.update_view(|view| {
            view.search_term = term;
            view.current_page = 1;
        });
    }

    /// Moves to `page`, clamped to the available pages. Returns the new page.
    pub fn go_to_page(&self, page: usize) -> usize {
        let mut state = self.inner.state.write();
        let State { records, view, .. } = &mut *state;
        view.current_page = page;
        view.clamp_page(records);
        view.current_page
    }

    /// Moves one page forward, stopping at the last page.
    pub fn next_page(&self) -> usize {
        let page = self.inner.state.read().view.current_page;
        self.go_to_page(page.saturating_add(1))
    }

    /// Moves one page back, stopping at page 1.
    pub fn prev_page(&self) -> usize {
        let page = self.inner.state.read().view.current_page;
        self.go_to_page(page.saturating_sub(1))
    }

    fn update_view(&self, change: impl FnOnce(&mut ViewState<R>)) {
        let mut state = self.inner.state.write();
        let State { records, view, .. } = &mut *state;
        change(view);
        view.clamp_page(records);
    }

    // ------------------------------------------------------------------
    // Read model
    // ------------------------------------------------------------------

    /// Derives the current page from the collection and view state.
    pub fn visible_slice(&self) -> VisibleSlice<R> {
        let state = self.inner.state.read();
        state.view.derive(&state.records)
    }

    /// Everything presentation needs, derived now.
    pub fn snapshot(&self) -> ControllerSnapshot<R> {
        let state = self.inner.state.read();
        let slice = state.view.derive(&state.records);
        ControllerSnapshot {
            records: slice.records,
            current_page: slice.current_page,
            total_pages: slice.total_pages,
            total_matches: slice.total_matches,
            selection: state.selection.to_set(),
            all_selected: state.all_selected(),
            pending: state.pending.clone(),
            last_error: state.last_error.clone(),
            search_term: state.view.search_term.clone(),
            sort: state.view.sort,
            role: state.role,
        }
    }

    /// The whole collection in service order, ignoring the view.
    pub fn records(&self) -> Vec<R> {
        self.inner.state.read().records.clone()
    }

    /// Records passing search and filters, sorted, on every page.
    pub fn matching_records(&self) -> Vec<R> {
        let state = self.inner.state.read();
        state
            .view
            .matching(&state.records)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The in-flight operation, if any.
    pub fn pending(&self) -> Option<PendingOperation<R::Id>> {
        self.inner.state.read().pending.clone()
    }

    /// Returns `true` while a service call is in flight.
    pub fn is_pending(&self) -> bool {
        self.inner.state.read().pending.is_some()
    }

    /// Message of the most recent failure.
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.read().last_error.clone()
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Sheet of every record passing search and filters, in display order,
    /// ignoring pagination.
    pub fn export_sheet(&self) -> ExportSheet {
        let state = self.inner.state.read();
        ExportSheet::from_records(state.view.matching(&state.records))
    }

    /// Encodes [`export_sheet`](Self::export_sheet) with `encoder`.
    #[instrument(skip_all, fields(resource = R::RESOURCE, format = encoder.extension()))]
    pub fn export_visible(&self, encoder: &dyn ExportEncoder) -> Result<Vec<u8>> {
        let sheet = self.export_sheet();
        let bytes = encoder.encode(&sheet)?;
        tracing::debug!(rows = sheet.len(), bytes = bytes.len(), "exported");
        Ok(bytes)
    }

    // ------------------------------------------------------------------
    // Identity and lifecycle
    // ------------------------------------------------------------------

    /// Role mutations are gated on.
    pub fn role(&self) -> Role {
        self.inner.state.read().role
    }

    /// Replaces the role, e.g. after a logout.
    pub fn set_role(&self, role: Role) {
        self.inner.state.write().role = role;
    }

    /// Tears the controller down.
    ///
    /// The collection and selection are discarded. Responses still in flight
    /// are dropped when they arrive, and every later service command fails
    /// with `ErrorKind::Cancelled`.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.write();
        state.shut_down = true;
        state.records.clear();
        state.selection.clear();
        state.pending = None;
        tracing::debug!(resource = R::RESOURCE, "controller shut down");
    }

    /// Returns `true` after [`shutdown`](Self::shutdown).
    pub fn is_shut_down(&self) -> bool {
        self.inner.state.read().shut_down
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The single permission check every mutation goes through.
    fn authorize(&self, operation: OperationKind) -> std::result::Result<(), MutationError> {
        let mut state = self.inner.state.write();
        PermissionGate::check(state.role, operation.as_str(), R::RESOURCE).map_err(|denied| {
            tracing::warn!(%denied, "mutation refused");
            state.last_error = Some(denied.to_string());
            MutationError::from(denied)
        })
    }

    /// Claims the pending slot.
    fn begin(&self, kind: OperationKind, target_ids: Vec<R::Id>) -> Result<PendingGuard<'_, R>> {
        let mut state = self.inner.state.write();
        if state.shut_down {
            return Err(Error::cancelled());
        }
        if let Some(pending) = &state.pending {
            tracing::debug!(pending = %pending.kind, requested = %kind, "controller busy");
            return Err(Error::busy());
        }
        state.pending = Some(PendingOperation { kind, target_ids });
        Ok(PendingGuard {
            state: &self.inner.state,
        })
    }

    /// Applies a confirmed result, unless the controller was torn down
    /// while waiting. Clears `last_error` before `change` runs.
    fn apply<T>(&self, change: impl FnOnce(&mut State<R>) -> T) -> Result<T> {
        let mut state = self.inner.state.write();
        if state.shut_down {
            tracing::debug!("discarding response after shutdown");
            return Err(Error::cancelled());
        }
        state.last_error = None;
        Ok(change(&mut state))
    }

    /// Records a failure in `last_error`, unless torn down.
    fn fail(&self, err: Error) -> Error {
        let mut state = self.inner.state.write();
        if state.shut_down {
            tracing::debug!(error = %err, "discarding failure after shutdown");
            return Error::cancelled();
        }
        tracing::warn!(error = %err, "operation failed");
        state.last_error = Some(err.to_string());
        err
    }
}
