//! Edit-form state for a single checkout.
//!
//! The form is a plain record of control states driven by explicit
//! transitions. Two toggles gate which controls are live:
//!
//! - `permanent` switches the date pair between required/enabled and
//!   cleared/released/disabled.
//! - each owner row's `client` flag releases that row's person fields.
//!   Turning it back off does not restore them.
//!
//! A `range` error sits on the date group once both dates have been
//! touched and the end precedes the start.

mod field;
mod owners;

pub use field::{FieldState, Validator};
pub use owners::{view_sub_owners, OwnerField, OwnerList, OwnerRow};

use tracing::debug;

use crate::engine::{CheckoutError, FieldError, InvariantViolation, ValidationError};
use crate::limits::MAX_CLIENT_CODE_LEN;
use crate::model::{normalize_day, parse_day, Checkout};

/// Top-level controls of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Server,
    ClientCode,
    StartDate,
    EndDate,
    Jira,
    HdEvent,
    Notes,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Server,
        Field::ClientCode,
        Field::StartDate,
        Field::EndDate,
        Field::Jira,
        Field::HdEvent,
        Field::Notes,
    ];

    /// Control path used in error reports.
    pub fn path(self) -> &'static str {
        match self {
            Field::Server => "server",
            Field::ClientCode => "clientCode",
            Field::StartDate => "dateRangeGroup.startDate",
            Field::EndDate => "dateRangeGroup.endDate",
            Field::Jira => "jira",
            Field::HdEvent => "hdEvent",
            Field::Notes => "notes",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn validators(self) -> &'static [Validator] {
        match self {
            Field::ClientCode => &[Validator::Required, Validator::MaxLength(MAX_CLIENT_CODE_LEN)],
            Field::StartDate | Field::EndDate => &[Validator::Required, Validator::Date],
            Field::Server | Field::Jira | Field::HdEvent | Field::Notes => &[],
        }
    }

    fn initial_value(self, c: &Checkout) -> String {
        match self {
            Field::Server => c.server.clone(),
            Field::ClientCode => c.client_code.clone(),
            Field::StartDate => c.start_date.clone().unwrap_or_default(),
            Field::EndDate => c.end_date.clone().unwrap_or_default(),
            Field::Jira => c.jira.clone(),
            Field::HdEvent => c.hd_event.clone(),
            Field::Notes => c.notes.clone(),
        }
    }
}

const RANGE_GROUP: &str = "dateRangeGroup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// New checkout; form open for input.
    Add,
    /// Existing checkout shown read-only.
    Display,
    /// Existing checkout open for input.
    Edit,
}

/// What a save request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    /// Nothing changed, or the form is read-only. Nothing to send.
    Unchanged,
    /// Assembled record ready for the reservation service.
    Submit(Checkout),
}

#[derive(Debug, Clone)]
pub struct FormState {
    /// Record the form was loaded from; assembly starts from it.
    base: Checkout,
    mode: FormMode,
    enabled: bool,
    permanent: bool,
    dirty: bool,
    range_error: bool,
    /// Indexed by `Field as usize`, in `Field::ALL` order.
    fields: [FieldState; 7],
    owners: OwnerList,
}

impl FormState {
    /// Open a checkout. Unsaved checkouts start in `Add` mode with one blank
    /// owner row; saved ones start read-only in `Display` mode.
    pub fn load(checkout: Checkout) -> Self {
        let fields =
            Field::ALL.map(|f| FieldState::new(f.initial_value(&checkout), f.validators()));
        let mut form = Self {
            permanent: checkout.permanent,
            base: checkout,
            mode: FormMode::Add,
            enabled: true,
            dirty: false,
            range_error: false,
            fields,
            owners: OwnerList::new(),
        };

        if form.base.is_unsaved() {
            form.owners.add_owner();
            form.apply_permanent(false);
        } else {
            form.owners.set_owners(&form.base.owners);
            form.apply_permanent(false);
            form.mode = FormMode::Display;
            form.disable();
        }
        form
    }

    pub fn checkout(&self) -> &Checkout {
        &self.base
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    pub fn has_range_error(&self) -> bool {
        self.range_error
    }

    pub fn field(&self, field: Field) -> &FieldState {
        &self.fields[field.index()]
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        &mut self.fields[field.index()]
    }

    pub fn owners(&self) -> &OwnerList {
        &self.owners
    }

    // ── Mode ─────────────────────────────────────────────────

    /// Switch a read-only form to `Edit`. Toggle rules are re-applied on the
    /// way in so permanent dates and client rows stay released.
    pub fn begin_edit(&mut self) {
        if self.mode == FormMode::Display {
            self.mode = FormMode::Edit;
        }
        self.enable();
    }

    fn enable(&mut self) {
        self.enabled = true;
        for f in self.fields.iter_mut() {
            f.enable();
        }
        self.owners.enable();
        self.apply_permanent(false);
    }

    fn disable(&mut self) {
        self.enabled = false;
        for f in self.fields.iter_mut() {
            f.disable();
        }
        self.owners.disable();
        self.range_error = false;
    }

    // ── User input ───────────────────────────────────────────

    /// Type into a top-level control. Ignored when the form or the control
    /// is disabled.
    pub fn input(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.enabled || !self.field(field).is_enabled() {
            return false;
        }
        self.field_mut(field).input(value);
        self.dirty = true;
        if matches!(field, Field::StartDate | Field::EndDate) {
            self.revalidate_range();
        }
        true
    }

    /// Flip the `permanent` toggle.
    ///
    /// On: both dates are cleared, lose their validators and are disabled.
    /// Off: both dates become required and enabled again.
    /// Either way both dates are revalidated immediately.
    pub fn set_permanent(&mut self, permanent: bool) -> bool {
        if !self.enabled {
            return false;
        }
        self.permanent = permanent;
        self.dirty = true;
        self.apply_permanent(true);
        true
    }

    fn apply_permanent(&mut self, clear_values: bool) {
        let permanent = self.permanent;
        let enabled = self.enabled;
        for f in [Field::StartDate, Field::EndDate] {
            let field = self.field_mut(f);
            if permanent {
                if clear_values {
                    field.set_value("");
                }
                field.clear_validators();
                field.disable();
            } else {
                field.set_validators(f.validators());
                if enabled {
                    field.enable();
                }
            }
            field.revalidate();
        }
        self.revalidate_range();
    }

    fn revalidate_range(&mut self) {
        let start = self.field(Field::StartDate);
        let end = self.field(Field::EndDate);
        self.range_error = if start.is_pristine()
            || end.is_pristine()
            || !start.is_enabled()
            || !end.is_enabled()
        {
            false
        } else {
            match (parse_day(start.value()), parse_day(end.value())) {
                (Some(s), Some(e)) => e < s,
                _ => false,
            }
        };
    }

    /// Type into an owner row's control.
    pub fn owner_input(
        &mut self,
        index: usize,
        field: OwnerField,
        value: impl Into<String>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(row) = self.owners.get_mut(index) else {
            return false;
        };
        if !row.field(field).is_enabled() {
            return false;
        }
        row.field_mut(field).input(value);
        self.dirty = true;
        true
    }

    /// Flip an owner row's `client` flag. See [`OwnerRow::set_client`].
    pub fn set_owner_client(&mut self, index: usize, client: bool) -> bool {
        self.edit_row(index, |row| row.set_client(client))
    }

    pub fn set_owner_primary(&mut self, index: usize, primary: bool) -> bool {
        self.edit_row(index, |row| row.primary = primary)
    }

    pub fn toggle_owner_alert(&mut self, index: usize) -> bool {
        self.edit_row(index, |row| row.alert = !row.alert)
    }

    fn edit_row(&mut self, index: usize, edit: impl FnOnce(&mut OwnerRow)) -> bool {
        if !self.enabled {
            return false;
        }
        match self.owners.get_mut(index) {
            Some(row) => {
                edit(row);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Append a blank owner row. Does not by itself dirty the form.
    pub fn add_owner(&mut self) -> Option<usize> {
        self.enabled.then(|| self.owners.add_owner())
    }

    /// Drop the last owner row. Silently refused for the only remaining row.
    pub fn remove_owner(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        match self.owners.remove_owner() {
            Ok(_) => {
                self.dirty = true;
                true
            }
            Err(v) => {
                debug!("remove_owner ignored: {v}");
                false
            }
        }
    }

    // ── Validation & save ────────────────────────────────────

    pub fn is_valid(&self) -> bool {
        !self.range_error && self.fields.iter().all(FieldState::is_valid) && self.owners.is_valid()
    }

    pub fn errors(&self) -> Vec<FieldError> {
        let mut out = Vec::new();
        for (f, state) in Field::ALL.iter().zip(&self.fields) {
            for e in state.errors() {
                out.push(FieldError::new(f.path(), e.clone()));
            }
        }
        if self.range_error {
            out.push(FieldError::new(RANGE_GROUP, ValidationError::Range));
        }
        out.extend(self.owners.errors());
        out
    }

    /// Resolve a save request.
    ///
    /// A read-only or untouched form resolves to `Unchanged`. An invalid form
    /// fails with its field errors; a valid one must have exactly one primary
    /// owner. The submitted record has dates rewritten as `M/D/YYYY`.
    pub fn prepare_save(&self) -> Result<SaveRequest, CheckoutError> {
        if !self.enabled || !self.dirty {
            return Ok(SaveRequest::Unchanged);
        }
        if !self.is_valid() {
            return Err(CheckoutError::Validation(self.errors()));
        }
        let primaries = self.owners.primary_count();
        if primaries != 1 {
            return Err(InvariantViolation::PrimaryOwnerCount(primaries).into());
        }
        Ok(SaveRequest::Submit(self.assemble()))
    }

    fn assemble(&self) -> Checkout {
        let value = |f: Field| self.field(f).value().to_string();
        let mut c = self.base.clone();
        c.server = value(Field::Server);
        c.client_code = value(Field::ClientCode);
        c.start_date = normalize_day(self.field(Field::StartDate).value());
        c.end_date = normalize_day(self.field(Field::EndDate).value());
        c.jira = value(Field::Jira);
        c.hd_event = value(Field::HdEvent);
        c.notes = value(Field::Notes);
        c.permanent = self.permanent;
        c.owners = self.owners.to_owners(c.id);
        c
    }
}
