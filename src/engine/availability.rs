use chrono::NaiveDate;

use crate::model::Checkout;

/// Whether a reservation is active on `today`.
///
/// Permanent reservations are always active and their dates are ignored.
/// Otherwise both bounds must be present and `start <= today <= end`
/// (inclusive at both ends); a missing bound means not checked out.
pub fn is_checked_out(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    permanent: bool,
    today: NaiveDate,
) -> bool {
    if permanent {
        return true;
    }
    match (start, end) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => false,
    }
}

/// [`is_checked_out`] over a checkout's stored date text.
/// Unparseable dates count as missing.
pub fn checkout_is_active(checkout: &Checkout, today: NaiveDate) -> bool {
    is_checked_out(
        checkout.start_day(),
        checkout.end_day(),
        checkout.permanent,
        today,
    )
}
