//! Read-side rules over the checkout set: status, search and ordering.

mod availability;
mod error;
mod filter;
mod sort;

pub use availability::{checkout_is_active, is_checked_out};
pub use error::{BackendError, CheckoutError, FieldError, InvariantViolation, ValidationError};
pub use filter::{filter, matches_query};
pub use sort::{sort_rows, SortColumn, SortDirection, SortState};
