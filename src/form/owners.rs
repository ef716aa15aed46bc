use tracing::debug;

use crate::engine::{FieldError, InvariantViolation};
use crate::model::{CheckoutId, Owner};

use super::field::{FieldState, Validator};

/// Editable text controls on an owner row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerField {
    FirstName,
    LastName,
    Email,
    Department,
}

impl OwnerField {
    pub const ALL: [OwnerField; 4] = [
        OwnerField::FirstName,
        OwnerField::LastName,
        OwnerField::Email,
        OwnerField::Department,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OwnerField::FirstName => "firstName",
            OwnerField::LastName => "lastName",
            OwnerField::Email => "email",
            OwnerField::Department => "department",
        }
    }

    fn validators(self) -> &'static [Validator] {
        match self {
            OwnerField::FirstName | OwnerField::LastName => &[Validator::Required],
            OwnerField::Email => &[Validator::Required, Validator::Email],
            OwnerField::Department => &[],
        }
    }
}

/// Form state of one owner in the checkout being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRow {
    id: i64,
    first_name: FieldState,
    last_name: FieldState,
    email: FieldState,
    department: FieldState,
    pub client: bool,
    pub primary: bool,
    pub alert: bool,
}

impl OwnerRow {
    /// Fresh row: empty required fields, alerts on, not primary.
    pub fn blank() -> Self {
        Self {
            id: 0,
            first_name: FieldState::new("", OwnerField::FirstName.validators()),
            last_name: FieldState::new("", OwnerField::LastName.validators()),
            email: FieldState::new("", OwnerField::Email.validators()),
            department: FieldState::new("", OwnerField::Department.validators()),
            client: false,
            primary: false,
            alert: true,
        }
    }

    /// Row for a stored owner. Client rows come up with their person
    /// fields already released.
    pub fn from_owner(owner: &Owner) -> Self {
        let state = |f: OwnerField, value: &str| FieldState::new(value, f.validators());
        let mut row = Self {
            id: owner.id,
            first_name: state(OwnerField::FirstName, owner.first_name.as_str()),
            last_name: state(OwnerField::LastName, owner.last_name.as_str()),
            email: state(OwnerField::Email, owner.email.as_str()),
            department: state(OwnerField::Department, owner.department.as_str()),
            client: owner.client,
            primary: owner.primary,
            alert: owner.alert,
        };
        if row.client {
            row.release_person_fields();
        }
        row
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn field(&self, field: OwnerField) -> &FieldState {
        match field {
            OwnerField::FirstName => &self.first_name,
            OwnerField::LastName => &self.last_name,
            OwnerField::Email => &self.email,
            OwnerField::Department => &self.department,
        }
    }

    pub fn field_mut(&mut self, field: OwnerField) -> &mut FieldState {
        match field {
            OwnerField::FirstName => &mut self.first_name,
            OwnerField::LastName => &mut self.last_name,
            OwnerField::Email => &mut self.email,
            OwnerField::Department => &mut self.department,
        }
    }

    /// Client toggle. Switching on clears validators and disables the person
    /// fields; switching off leaves them as they are.
    pub fn set_client(&mut self, client: bool) {
        self.client = client;
        if client {
            self.release_person_fields();
        }
    }

    fn release_person_fields(&mut self) {
        for f in OwnerField::ALL {
            let field = self.field_mut(f);
            field.clear_validators();
            field.disable();
        }
    }

    pub(super) fn enable(&mut self) {
        for f in OwnerField::ALL {
            self.field_mut(f).enable();
        }
        if self.client {
            self.release_person_fields();
        }
    }

    pub(super) fn disable(&mut self) {
        for f in OwnerField::ALL {
            self.field_mut(f).disable();
        }
    }

    pub fn is_valid(&self) -> bool {
        OwnerField::ALL.iter().all(|f| self.field(*f).is_valid())
    }

    fn errors_into(&self, index: usize, out: &mut Vec<FieldError>) {
        for f in OwnerField::ALL {
            for e in self.field(f).errors() {
                out.push(FieldError::new(format!("owners[{index}].{}", f.key()), e.clone()));
            }
        }
    }

    pub fn to_owner(&self, checkout_id: CheckoutId) -> Owner {
        Owner {
            id: self.id,
            first_name: self.first_name.value().to_string(),
            last_name: self.last_name.value().to_string(),
            email: self.email.value().to_string(),
            department: self.department.value().to_string(),
            client: self.client,
            primary: self.primary,
            alert: self.alert,
            checkout_id,
        }
    }
}

/// Ordered owner sub-list of the checkout being edited.
///
/// The single-primary rule is not enforced here; rows may have zero or
/// several primaries until the form is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerList {
    rows: Vec<OwnerRow>,
}

impl OwnerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank row and return its index.
    pub fn add_owner(&mut self) -> usize {
        self.rows.push(OwnerRow::blank());
        self.rows.len() - 1
    }

    /// Remove the last row. Refused when it is the only one left.
    pub fn remove_owner(&mut self) -> Result<OwnerRow, InvariantViolation> {
        if self.rows.len() <= 1 {
            debug!(rows = self.rows.len(), "refusing to remove last owner");
            return Err(InvariantViolation::LastOwner);
        }
        self.rows.pop().ok_or(InvariantViolation::LastOwner)
    }

    /// Replace all rows with stored owners, as loaded.
    pub fn set_owners(&mut self, owners: &[Owner]) {
        self.rows = owners.iter().map(OwnerRow::from_owner).collect();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[OwnerRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&OwnerRow> {
        self.rows.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut OwnerRow> {
        self.rows.get_mut(index)
    }

    pub fn primary_count(&self) -> usize {
        self.rows.iter().filter(|r| r.primary).count()
    }

    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(OwnerRow::is_valid)
    }

    pub fn errors(&self) -> Vec<FieldError> {
        let mut out = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            row.errors_into(i, &mut out);
        }
        out
    }

    pub fn to_owners(&self, checkout_id: CheckoutId) -> Vec<Owner> {
        self.rows.iter().map(|r| r.to_owner(checkout_id)).collect()
    }

    pub(super) fn enable(&mut self) {
        self.rows.iter_mut().for_each(OwnerRow::enable);
    }

    pub(super) fn disable(&mut self) {
        self.rows.iter_mut().for_each(OwnerRow::disable);
    }
}

/// Every owner except the primary ones ("other contacts").
pub fn view_sub_owners(owners: &[Owner]) -> Vec<Owner> {
    owners.iter().filter(|o| !o.primary).cloned().collect()
}
