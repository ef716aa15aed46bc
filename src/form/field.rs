use crate::engine::ValidationError;
use crate::model::parse_day;

/// Validators a form control can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    MaxLength(usize),
    /// `[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+`, matched against the whole value.
    Email,
    /// `M/D/YYYY` or `YYYY-MM-DD`.
    Date,
}

impl Validator {
    /// Only `Required` rejects an empty value.
    pub fn check(self, value: &str) -> Option<ValidationError> {
        match self {
            Validator::Required if value.is_empty() => Some(ValidationError::Required),
            Validator::Required => None,
            Validator::MaxLength(max) => {
                let actual = value.chars().count();
                (actual > max).then_some(ValidationError::MaxLength { max, actual })
            }
            Validator::Email if value.is_empty() || is_email(value) => None,
            Validator::Email => Some(ValidationError::Pattern),
            Validator::Date if value.is_empty() || parse_day(value).is_some() => None,
            Validator::Date => Some(ValidationError::Date),
        }
    }
}

/// The whole value must match, not just a substring of it.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let domain_ok = !domain.is_empty()
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    local_ok && domain_ok
}

/// One form control: its value, whether it is live, and its validators.
///
/// A disabled control carries no errors and never blocks a save.
/// `pristine` flips only on user input, never on programmatic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    value: String,
    enabled: bool,
    pristine: bool,
    validators: Vec<Validator>,
    errors: Vec<ValidationError>,
}

impl FieldState {
    pub fn new(value: impl Into<String>, validators: &[Validator]) -> Self {
        let mut field = Self {
            value: value.into(),
            enabled: true,
            pristine: true,
            validators: validators.to_vec(),
            errors: Vec::new(),
        };
        field.revalidate();
        field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_pristine(&self) -> bool {
        self.pristine
    }

    pub fn is_required(&self) -> bool {
        self.validators.contains(&Validator::Required)
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        !self.enabled || self.errors.is_empty()
    }

    /// User edit: marks the control touched.
    pub fn input(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.pristine = false;
        self.revalidate();
    }

    /// Programmatic write; leaves `pristine` alone.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.revalidate();
    }

    /// Replace the validator set. Takes effect on the next `revalidate`.
    pub fn set_validators(&mut self, validators: &[Validator]) {
        self.validators = validators.to_vec();
    }

    /// Takes effect on the next `revalidate`.
    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.revalidate();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.errors.clear();
    }

    pub fn revalidate(&mut self) {
        self.errors = if self.enabled {
            self.validators
                .iter()
                .filter_map(|v| v.check(&self.value))
                .collect()
        } else {
            Vec::new()
        };
    }
}
