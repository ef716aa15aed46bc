//! One operator's browsing/editing session.
//!
//! The session owns the checkout collection, the filtered view, the sort
//! memory and the open edit form. It is created when the operator starts
//! browsing and dropped when they leave; nothing here is shared.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::engine::{
    checkout_is_active, filter, BackendError, CheckoutError, InvariantViolation, SortColumn,
    SortDirection, SortState,
};
use crate::form::{view_sub_owners, FormState, SaveRequest};
use crate::limits::MAX_PENDING_NOTIFICATIONS;
use crate::model::{Checkout, CheckoutId, Owner};
use crate::observability;
use crate::service::ReservationService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Message for the UI's notification area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

/// An action waiting on operator confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Close a form that has unsaved changes.
    DiscardChanges,
    /// Delete the checkout open in the form.
    Delete(CheckoutId),
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Confirmation::DiscardChanges => "Are you sure you want to cancel and lose all changes?",
            Confirmation::Delete(_) => "Are you sure you want to delete this checkout record?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    NoEditor,
    /// Untouched or read-only form; nothing was sent.
    Unchanged,
    Created(Checkout),
    Updated(Checkout),
}

pub struct BrowsingSession {
    service: Arc<dyn ReservationService>,
    today: NaiveDate,
    server: Option<String>,
    checkouts: Vec<Checkout>,
    visible: Vec<Checkout>,
    list_filter: String,
    sort: SortState,
    editor: Option<FormState>,
    pending: Option<Confirmation>,
    notifications: VecDeque<Notification>,
}

/// Time a backend call and count it by outcome.
async fn observe<T>(
    op: &'static str,
    call: impl Future<Output = Result<T, BackendError>>,
) -> Result<T, BackendError> {
    let start = Instant::now();
    let result = call.await;
    let status = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!(observability::SERVICE_REQUESTS_TOTAL, "op" => op, "status" => status)
        .increment(1);
    metrics::histogram!(observability::SERVICE_REQUEST_DURATION_SECONDS, "op" => op)
        .record(start.elapsed().as_secs_f64());
    result
}

impl BrowsingSession {
    /// Empty session; call [`load_all`](Self::load_all) or
    /// [`select_server`](Self::select_server) to populate it.
    pub fn new(service: Arc<dyn ReservationService>, today: NaiveDate) -> Self {
        Self {
            service,
            today,
            server: None,
            checkouts: Vec::new(),
            visible: Vec::new(),
            list_filter: String::new(),
            sort: SortState::new(),
            editor: None,
            pending: None,
            notifications: VecDeque::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Every checkout loaded, in backend order.
    pub fn checkouts(&self) -> &[Checkout] {
        &self.checkouts
    }

    /// The filtered, possibly sorted, rows the table shows.
    pub fn visible(&self) -> &[Checkout] {
        &self.visible
    }

    pub fn list_filter(&self) -> &str {
        &self.list_filter
    }

    pub fn last_sort(&self) -> &SortState {
        &self.sort
    }

    pub fn is_checked_out(&self, checkout: &Checkout) -> bool {
        checkout_is_active(checkout, self.today)
    }

    /// Owners of `checkout` other than the primary one.
    pub fn sub_owners(&self, checkout: &Checkout) -> Vec<Owner> {
        view_sub_owners(&checkout.owners)
    }

    // ── Loading ──────────────────────────────────────────────

    pub async fn load_all(&mut self) -> Result<(), BackendError> {
        let result = observe("list_all", self.service.list_all()).await;
        self.replace_checkouts(result)?;
        self.server = None;
        Ok(())
    }

    /// Show only the checkouts of one server.
    pub async fn select_server(&mut self, code: &str) -> Result<(), BackendError> {
        let result = observe("list_by_server", self.service.list_by_server(code)).await;
        self.replace_checkouts(result)?;
        self.server = Some(code.to_string());
        Ok(())
    }

    /// Reload from whichever source the session currently shows.
    async fn refresh(&mut self) -> Result<(), BackendError> {
        match self.server.clone() {
            Some(code) => self.select_server(&code).await,
            None => self.load_all().await,
        }
    }

    /// Install a fresh collection and reset the view to all of it.
    /// On failure the current collection is kept.
    fn replace_checkouts(
        &mut self,
        result: Result<Vec<Checkout>, BackendError>,
    ) -> Result<(), BackendError> {
        match result {
            Ok(checkouts) => {
                info!(count = checkouts.len(), "checkouts loaded");
                self.visible = checkouts.clone();
                self.checkouts = checkouts;
                self.list_filter.clear();
                self.record_counts();
                Ok(())
            }
            Err(e) => {
                warn!("loading checkouts failed: {e}");
                self.notify(Severity::Error, "Error", e.message.clone());
                Err(e)
            }
        }
    }

    fn record_counts(&self) {
        metrics::gauge!(observability::CHECKOUTS_LOADED).set(self.checkouts.len() as f64);
        metrics::gauge!(observability::CHECKOUTS_VISIBLE).set(self.visible.len() as f64);
    }

    // ── Browsing ─────────────────────────────────────────────

    /// Set the search text. The view is rebuilt from the full collection,
    /// so an earlier sort is not carried over.
    pub fn set_filter(&mut self, query: &str) {
        self.list_filter = query.to_string();
        self.visible = filter(&self.checkouts, query);
        debug!(query, hits = self.visible.len(), "filter applied");
        self.record_counts();
    }

    /// Sort the visible rows by `column`, flipping direction on repeat.
    pub fn sort(&mut self, column: SortColumn) -> SortDirection {
        let direction = self.sort.sort(&mut self.visible, column, self.today);
        debug!(last_sort = %self.sort, "sorted");
        direction
    }

    // ── Editing ──────────────────────────────────────────────

    pub fn editor(&self) -> Option<&FormState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut FormState> {
        self.editor.as_mut()
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.pending
    }

    /// Open the form on a checkout. `"0"` opens a blank new checkout.
    pub async fn open(&mut self, id: &str) -> Result<(), BackendError> {
        match observe("get_by_id", self.service.get_by_id(id)).await {
            Ok(checkout) => {
                debug!(id = checkout.id, "checkout opened");
                self.editor = Some(FormState::load(checkout));
                self.pending = None;
                Ok(())
            }
            Err(e) => {
                self.notify(Severity::Error, "Error", e.message.clone());
                Err(e)
            }
        }
    }

    pub async fn open_new(&mut self) -> Result<(), BackendError> {
        self.open("0").await
    }

    /// Switch the open read-only form to edit mode.
    pub fn begin_edit(&mut self) -> bool {
        match self.editor.as_mut() {
            Some(form) => {
                form.begin_edit();
                true
            }
            None => false,
        }
    }

    /// Submit the open form.
    ///
    /// Untouched forms resolve to [`SaveOutcome::Unchanged`] without a
    /// backend call. Validation and primary-owner failures keep the form
    /// open. A backend failure keeps the form and the collection as they
    /// were; success closes the form and reloads the collection.
    pub async fn save(&mut self) -> Result<SaveOutcome, CheckoutError> {
        let result = self.save_inner().await;
        let outcome = observability::save_outcome_label(&result);
        metrics::counter!(observability::SAVE_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
        result
    }

    async fn save_inner(&mut self) -> Result<SaveOutcome, CheckoutError> {
        let Some(form) = self.editor.as_ref() else {
            return Ok(SaveOutcome::NoEditor);
        };
        let record = match form.prepare_save() {
            Ok(SaveRequest::Unchanged) => return Ok(SaveOutcome::Unchanged),
            Ok(SaveRequest::Submit(record)) => record,
            Err(e @ CheckoutError::Invariant(_)) => {
                self.notify(Severity::Error, "Error", e.to_string());
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let creating = record.is_unsaved();

        let saved = match observe("save", self.service.save(record)).await {
            Ok(saved) => saved,
            Err(e) => {
                self.notify(Severity::Error, "Error", e.message.clone());
                return Err(e.into());
            }
        };

        info!(id = saved.id, creating, "checkout saved");
        self.editor = None;
        self.pending = None;
        if creating {
            self.notify(Severity::Success, "Success", "New Checkout Record Added!");
        } else {
            self.notify(Severity::Success, "Success", "Checkout Record Updated!");
        }
        if let Err(e) = self.refresh().await {
            warn!("refresh after save failed: {e}");
        }
        Ok(if creating {
            SaveOutcome::Created(saved)
        } else {
            SaveOutcome::Updated(saved)
        })
    }

    /// Close the form. A dirty form asks for confirmation first.
    pub fn cancel(&mut self) -> Option<Confirmation> {
        let dirty = self.editor.as_ref().is_some_and(FormState::is_dirty);
        if dirty {
            self.pending = Some(Confirmation::DiscardChanges);
            return self.pending;
        }
        self.editor = None;
        None
    }

    /// Ask to delete the checkout open in the form.
    pub fn request_delete(&mut self) -> Result<Confirmation, InvariantViolation> {
        let id = self
            .editor
            .as_ref()
            .map(|f| f.checkout().id)
            .filter(|id| *id != 0)
            .ok_or(InvariantViolation::UnsavedCheckout)?;
        let confirmation = Confirmation::Delete(id);
        self.pending = Some(confirmation);
        Ok(confirmation)
    }

    /// Drop a pending confirmation without acting on it.
    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    /// Carry out the pending confirmation. Does nothing when `confirmation`
    /// is not the one pending.
    pub async fn confirm(&mut self, confirmation: Confirmation) -> Result<(), CheckoutError> {
        if self.pending != Some(confirmation) {
            debug!(?confirmation, "no matching confirmation pending");
            return Ok(());
        }
        self.pending = None;
        match confirmation {
            Confirmation::DiscardChanges => {
                self.editor = None;
                Ok(())
            }
            Confirmation::Delete(id) => self.delete(id).await,
        }
    }

    async fn delete(&mut self, id: CheckoutId) -> Result<(), CheckoutError> {
        if let Err(e) = observe("delete", self.service.delete(id)).await {
            self.notify(Severity::Error, "Error", e.message.clone());
            return Err(e.into());
        }
        info!(id, "checkout deleted");
        self.editor = None;
        self.notify(
            Severity::Success,
            "Success",
            "Checkout Record has succesfully been removed!",
        );
        if let Err(e) = self.refresh().await {
            warn!("refresh after delete failed: {e}");
        }
        Ok(())
    }

    // ── Notifications ────────────────────────────────────────

    /// Queue a notification, dropping the oldest once the queue is full.
    pub fn notify(
        &mut self,
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        if self.notifications.len() >= MAX_PENDING_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn notifications(&self) -> &VecDeque<Notification> {
        &self.notifications
    }

    /// Drain the queue, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }
}
