/// A single validator failure on a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    MaxLength { max: usize, actual: usize },
    Pattern,
    /// Text that does not read as a calendar date.
    Date,
    /// End date earlier than start date on the date-range group.
    Range,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required => write!(f, "required"),
            ValidationError::MaxLength { max, actual } => {
                write!(f, "at most {max} characters allowed, got {actual}")
            }
            ValidationError::Pattern => write!(f, "invalid format"),
            ValidationError::Date => write!(f, "not a valid date"),
            ValidationError::Range => write!(f, "end date is before start date"),
        }
    }
}

/// A validation failure tied to the control path it was raised on,
/// e.g. `clientCode`, `dateRangeGroup` or `owners[1].email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub error: ValidationError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: ValidationError) -> Self {
        Self {
            field: field.into(),
            error,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Non-success response from the reservation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backend error: {}", self.message)
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A checkout's owner list must keep at least one entry while editing.
    LastOwner,
    /// Saving requires exactly one primary owner; carries the count found.
    PrimaryOwnerCount(usize),
    /// Delete was requested for a checkout that was never saved.
    UnsavedCheckout,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::LastOwner => write!(f, "a checkout must keep at least one owner"),
            InvariantViolation::PrimaryOwnerCount(n) => {
                write!(f, "exactly one primary owner is required, found {n}")
            }
            InvariantViolation::UnsavedCheckout => {
                write!(f, "checkout has not been saved yet")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    Validation(Vec<FieldError>),
    Backend(BackendError),
    Invariant(InvariantViolation),
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutError::Validation(errors) => {
                write!(f, "form is invalid")?;
                for (i, e) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{e}")?;
                }
                Ok(())
            }
            CheckoutError::Backend(e) => write!(f, "{e}"),
            CheckoutError::Invariant(v) => write!(f, "invariant violated: {v}"),
        }
    }
}

impl std::error::Error for CheckoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckoutError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for CheckoutError {
    fn from(e: BackendError) -> Self {
        CheckoutError::Backend(e)
    }
}

impl From<InvariantViolation> for CheckoutError {
    fn from(v: InvariantViolation) -> Self {
        CheckoutError::Invariant(v)
    }
}
